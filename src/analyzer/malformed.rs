use regex::Regex;

use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

/// Malformed-input analyzer. Unlike the other classes it keeps inspecting
/// the body on 4xx: a rejected request that leaks a stack trace is still a
/// finding.
pub struct MalformedInputAnalyzer {
    leak_patterns: Vec<Regex>,
}

impl MalformedInputAnalyzer {
    pub fn new() -> Self {
        let leak_patterns = vec![
            Regex::new(r"(?i)traceback \(most recent call last\)").unwrap(),
            Regex::new(r"(?i)at [\w$.]+\([\w]+\.java:\d+\)").unwrap(),
            Regex::new(r"(?i)java\.lang\.\w+exception").unwrap(),
            Regex::new(r"(?i)system\.\w*exception").unwrap(),
            Regex::new(r"(?i)(type|reference|syntax)error:").unwrap(),
            Regex::new(r"(?i)at .+ \(.*node_modules.*\)").unwrap(),
            Regex::new(r"(?i)goroutine \d+ \[").unwrap(),
            Regex::new(r#"(?i)file "[^"]+\.py", line \d+"#).unwrap(),
            Regex::new(r"(?i)stack trace:").unwrap(),
        ];
        Self { leak_patterns }
    }

    fn leak_match(&self, body: &str) -> Option<&Regex> {
        self.leak_patterns.iter().find(|p| p.is_match(body))
    }
}

impl Default for MalformedInputAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for MalformedInputAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::MalformedInput
    }

    fn analyze(
        &self,
        response: &ResponseCapture,
        _payload: &str,
        _baseline_status: Option<u16>,
        _elapsed_ms: u64,
    ) -> AnalysisResult {
        if let Some(blocked) = waf::check_blocked(response, self.vuln_type()) {
            return blocked;
        }

        if let Some(pattern) = self.leak_match(&response.body) {
            if response.status >= 500 {
                return AnalysisResult::vulnerable(
                    Confidence::High,
                    format!("Stack trace leaked in error response ({})", pattern.as_str()),
                    "Verbose error leakage on malformed input",
                );
            }
            return AnalysisResult::vulnerable(
                Confidence::Low,
                format!(
                    "Verbose error detail in rejection response ({})",
                    pattern.as_str()
                ),
                "Rejected input still leaks implementation detail",
            );
        }

        if response.status >= 500 {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                format!("Unhandled server error ({}) on malformed input", response.status),
                "Server errored instead of rejecting the input",
            );
        }

        if (400..500).contains(&response.status) {
            return AnalysisResult::not_vulnerable(
                Confidence::Medium,
                format!("Malformed input rejected cleanly (status {})", response.status),
                "Input validation appears to be in place",
            );
        }

        common::no_signal(response)
    }
}
