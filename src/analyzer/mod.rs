mod cmdi;
mod content_type;
mod header;
mod large_payload;
mod malformed;
mod nosqli;
mod rate_limit;
mod sqli;
mod traversal;
pub mod waf;
mod xss;

pub use cmdi::CommandInjectionAnalyzer;
pub use content_type::ContentTypeAnalyzer;
pub use header::HeaderInjectionAnalyzer;
pub use large_payload::LargePayloadAnalyzer;
pub use malformed::MalformedInputAnalyzer;
pub use nosqli::NoSqlInjectionAnalyzer;
pub use rate_limit::RateLimitAnalyzer;
pub use sqli::SqlInjectionAnalyzer;
pub use traversal::PathTraversalAnalyzer;
pub use xss::XssAnalyzer;

use crate::models::{AnalysisResult, Confidence, ResponseCapture, Severity, VulnType};
use crate::payloads;

/// Detection plugin for one vulnerability class. Implementations are
/// stateless across calls; `analyze` must follow the shared evaluation
/// order (WAF short-circuit, benign rejection, signature scan, contextual
/// checks, default) so verdicts stay comparable across classes.
pub trait Analyzer: Send + Sync {
    fn vuln_type(&self) -> VulnType;

    fn severity(&self) -> Severity {
        payloads::severity_for(self.vuln_type())
    }

    fn payloads(&self) -> Vec<String> {
        payloads::payloads_for(self.vuln_type())
    }

    fn analyze(
        &self,
        response: &ResponseCapture,
        payload: &str,
        baseline_status: Option<u16>,
        elapsed_ms: u64,
    ) -> AnalysisResult;
}

/// Ordered registry, one analyzer per class. Built once at scan start; the
/// order here fixes the order of test records per endpoint.
pub fn registry() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(SqlInjectionAnalyzer),
        Box::new(NoSqlInjectionAnalyzer),
        Box::new(CommandInjectionAnalyzer),
        Box::new(XssAnalyzer),
        Box::new(PathTraversalAnalyzer),
        Box::new(HeaderInjectionAnalyzer),
        Box::new(RateLimitAnalyzer),
        Box::new(LargePayloadAnalyzer),
        Box::new(ContentTypeAnalyzer),
        Box::new(MalformedInputAnalyzer::new()),
    ]
}

pub(crate) mod common {
    use super::*;

    pub const TIMING_THRESHOLD_MS: u64 = 4500;

    const DELAY_KEYWORDS: &[&str] = &["sleep", "waitfor", "benchmark", "pg_sleep", "ping", "delay"];

    pub fn has_delay_keyword(payload: &str) -> bool {
        let lower = payload.to_lowercase();
        DELAY_KEYWORDS.iter().any(|k| lower.contains(k))
    }

    /// Step 2: plain 4xx rejection with no WAF signal means the input was
    /// turned away before it could do harm.
    pub fn benign_rejection(response: &ResponseCapture, statuses: &[u16]) -> Option<AnalysisResult> {
        if statuses.contains(&response.status) {
            return Some(AnalysisResult::not_vulnerable(
                Confidence::Medium,
                format!("Input rejected with status {}", response.status),
                "Payload was rejected by input handling",
            ));
        }
        None
    }

    /// Step 3: ordered substring scan over the lowercased body. First match
    /// wins.
    pub fn match_signature<'a>(body_lower: &str, signatures: &[&'a str]) -> Option<&'a str> {
        signatures.iter().find(|s| body_lower.contains(*s)).copied()
    }

    pub fn signature_hit(signature: &str, what: &str) -> AnalysisResult {
        AnalysisResult::vulnerable(
            Confidence::High,
            format!("Response contains {} signature: \"{}\"", what, signature),
            format!("{} detected via response signature", what),
        )
    }

    /// Baseline 4xx flipping to 2xx after injection. Known false-positive
    /// source on endpoints with unstable responses; kept as documented.
    pub fn status_flip(response: &ResponseCapture, baseline_status: Option<u16>) -> bool {
        matches!(baseline_status, Some(b) if (400..500).contains(&b)) && response.is_success()
    }

    /// Step 5: nothing matched.
    pub fn no_signal(response: &ResponseCapture) -> AnalysisResult {
        AnalysisResult::not_vulnerable(
            Confidence::Low,
            format!("No vulnerability signal (status {})", response.status),
            "No signal found in response",
        )
    }

    /// Payload forms an analyzer should look for when checking reflection:
    /// verbatim, URL-decoded, and HTML-entity-decoded.
    pub fn decoded_forms(payload: &str) -> Vec<String> {
        let mut forms = vec![payload.to_string()];

        if let Ok(decoded) = urlencoding::decode(payload) {
            let decoded = decoded.into_owned();
            if decoded != payload {
                forms.push(decoded);
            }
        }

        let entity_decoded = payload
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#x27;", "'")
            .replace("&#39;", "'")
            .replace("&amp;", "&");
        if entity_decoded != payload {
            forms.push(entity_decoded);
        }

        forms
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::ResponseCapture;
    use std::collections::BTreeMap;

    pub fn capture(status: u16, body: &str) -> ResponseCapture {
        ResponseCapture::new(status, BTreeMap::new(), body.to_string(), 10)
    }

    pub fn capture_with_header(status: u16, body: &str, key: &str, value: &str) -> ResponseCapture {
        let mut headers = BTreeMap::new();
        headers.insert(key.to_string(), value.to_string());
        ResponseCapture::new(status, headers, body.to_string(), 10)
    }
}
