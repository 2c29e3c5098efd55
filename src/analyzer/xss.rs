use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const DANGEROUS_TOKENS: &[&str] = &[
    "<script",
    "<svg",
    "<img",
    "<iframe",
    "<body",
    "onerror=",
    "onload=",
    "javascript:",
];

const BENIGN_STATUSES: &[u16] = &[400, 403, 404];

pub struct XssAnalyzer;

impl XssAnalyzer {
    fn escaped_form(payload: &str) -> String {
        payload
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }
}

impl Analyzer for XssAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::Xss
    }

    fn analyze(
        &self,
        response: &ResponseCapture,
        payload: &str,
        _baseline_status: Option<u16>,
        _elapsed_ms: u64,
    ) -> AnalysisResult {
        if let Some(blocked) = waf::check_blocked(response, self.vuln_type()) {
            return blocked;
        }

        if let Some(rejected) = common::benign_rejection(response, BENIGN_STATUSES) {
            return rejected;
        }

        let payload_lower = payload.to_lowercase();
        let has_dangerous_token = DANGEROUS_TOKENS.iter().any(|t| payload_lower.contains(t));

        // Verbatim reflection of the payload, or of its URL-decoded or
        // entity-decoded form, alongside a dangerous token.
        if has_dangerous_token {
            for form in common::decoded_forms(payload) {
                if response.body.contains(&form) {
                    return AnalysisResult::vulnerable(
                        Confidence::High,
                        format!("Payload reflected unescaped: \"{}\"", form),
                        "Reflected XSS: payload returned without output encoding",
                    );
                }
            }
        }

        let escaped = Self::escaped_form(payload);
        if escaped != payload && response.body.contains(&escaped) {
            return AnalysisResult::not_vulnerable(
                Confidence::Medium,
                "Payload reflected but HTML-encoded",
                "Output encoding appears to be in place",
            );
        }

        // Partial reflection in an HTML context is weaker evidence.
        if response.content_type().contains("text/html")
            && payload.contains("alert(1)")
            && response.body.contains("alert(1)")
        {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "Script fragment reflected in HTML response",
                "Possible XSS: partial payload reflection in HTML context",
            );
        }

        common::no_signal(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::{capture, capture_with_header};

    #[test]
    fn test_unescaped_reflection() {
        let payload = "<script>alert(1)</script>";
        let response = capture(200, "<p>You searched for <script>alert(1)</script></p>");
        let result = XssAnalyzer.analyze(&response, payload, Some(200), 40);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_url_decoded_reflection() {
        let payload = "%3Cscript%3Ealert(1)%3C%2Fscript%3E";
        let response = capture(200, "result: <script>alert(1)</script>");
        let result = XssAnalyzer.analyze(&response, payload, Some(200), 40);
        assert!(result.vulnerable);
    }

    #[test]
    fn test_encoded_reflection_is_safe() {
        let payload = "<script>alert(1)</script>";
        let response = capture(200, "You searched for &lt;script&gt;alert(1)&lt;/script&gt;");
        let result = XssAnalyzer.analyze(&response, payload, Some(200), 40);
        assert!(!result.vulnerable);
        assert!(result.indicators[0].contains("encoded"));
    }

    #[test]
    fn test_partial_reflection_in_html() {
        let response = capture_with_header(
            200,
            "<html>value was alert(1)</html>",
            "Content-Type",
            "text/html; charset=utf-8",
        );
        let result = XssAnalyzer.analyze(&response, "'-alert(1)-'", Some(200), 40);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_no_reflection() {
        let response = capture(200, "{\"results\": []}");
        let result = XssAnalyzer.analyze(&response, "<svg onload=alert(1)>", Some(200), 40);
        assert!(!result.vulnerable);
    }
}
