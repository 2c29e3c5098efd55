use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten vulnerability classes the scanner probes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnType {
    SqlInjection,
    NoSqlInjection,
    CommandInjection,
    Xss,
    PathTraversal,
    HeaderInjection,
    RateLimitBypass,
    LargePayload,
    ContentTypeManipulation,
    MalformedInput,
}

impl VulnType {
    pub const ALL: [VulnType; 10] = [
        VulnType::SqlInjection,
        VulnType::NoSqlInjection,
        VulnType::CommandInjection,
        VulnType::Xss,
        VulnType::PathTraversal,
        VulnType::HeaderInjection,
        VulnType::RateLimitBypass,
        VulnType::LargePayload,
        VulnType::ContentTypeManipulation,
        VulnType::MalformedInput,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sql_injection" | "sqli" => Some(VulnType::SqlInjection),
            "nosql_injection" | "nosqli" => Some(VulnType::NoSqlInjection),
            "command_injection" | "cmdi" => Some(VulnType::CommandInjection),
            "xss" => Some(VulnType::Xss),
            "path_traversal" | "traversal" => Some(VulnType::PathTraversal),
            "header_injection" | "crlf" => Some(VulnType::HeaderInjection),
            "rate_limit_bypass" | "rate_limit" => Some(VulnType::RateLimitBypass),
            "large_payload" => Some(VulnType::LargePayload),
            "content_type_manipulation" | "content_type" => {
                Some(VulnType::ContentTypeManipulation)
            }
            "malformed_input" | "malformed" => Some(VulnType::MalformedInput),
            _ => None,
        }
    }

    /// Fixed severity per class; never computed per probe.
    pub fn severity(&self) -> Severity {
        match self {
            VulnType::SqlInjection | VulnType::NoSqlInjection | VulnType::CommandInjection => {
                Severity::Critical
            }
            VulnType::Xss | VulnType::PathTraversal | VulnType::HeaderInjection => Severity::High,
            VulnType::RateLimitBypass
            | VulnType::LargePayload
            | VulnType::ContentTypeManipulation => Severity::Medium,
            VulnType::MalformedInput => Severity::Low,
        }
    }
}

impl fmt::Display for VulnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VulnType::SqlInjection => "SQL Injection",
            VulnType::NoSqlInjection => "NoSQL Injection",
            VulnType::CommandInjection => "Command Injection",
            VulnType::Xss => "Cross-Site Scripting",
            VulnType::PathTraversal => "Path Traversal",
            VulnType::HeaderInjection => "Header Injection",
            VulnType::RateLimitBypass => "Rate Limit Bypass",
            VulnType::LargePayload => "Large Payload Handling",
            VulnType::ContentTypeManipulation => "Content-Type Manipulation",
            VulnType::MalformedInput => "Malformed Input Handling",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// Immutable verdict an analyzer returns for one probe. Indicators are
/// ordered by detection priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub vulnerable: bool,
    pub confidence: Confidence,
    pub indicators: Vec<String>,
    pub notes: String,
}

impl AnalysisResult {
    pub fn vulnerable(
        confidence: Confidence,
        indicator: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            vulnerable: true,
            confidence,
            indicators: vec![indicator.into()],
            notes: notes.into(),
        }
    }

    pub fn not_vulnerable(
        confidence: Confidence,
        indicator: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            vulnerable: false,
            confidence,
            indicators: vec![indicator.into()],
            notes: notes.into(),
        }
    }

    pub fn with_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.indicators.push(indicator.into());
        self
    }
}
