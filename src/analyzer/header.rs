use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const BENIGN_STATUSES: &[u16] = &[400, 403, 404];

/// CRLF / response-splitting analyzer. Positive evidence lives in the
/// response headers rather than the body: a forged Set-Cookie, Location, or
/// marker header appearing after a line-break payload.
pub struct HeaderInjectionAnalyzer;

impl HeaderInjectionAnalyzer {
    fn has_line_break(payload: &str) -> bool {
        payload.contains('\r')
            || payload.contains('\n')
            || payload.to_lowercase().contains("%0d")
            || payload.to_lowercase().contains("%0a")
    }
}

impl Analyzer for HeaderInjectionAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::HeaderInjection
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

        if response.header("X-Injected").is_some() {
            return AnalysisResult::vulnerable(
                Confidence::High,
                "Forged X-Injected header present in response",
                "Header injection: CRLF payload split into a new header",
            );
        }

        if Self::has_line_break(payload) {
            if let Some(cookie) = response.header("Set-Cookie") {
                if cookie.contains("injected=1") {
                    return AnalysisResult::vulnerable(
                        Confidence::High,
                        "Forged Set-Cookie from CRLF payload present in response",
                        "Header injection: attacker-controlled cookie set",
                    );
                }
            }
            if let Some(location) = response.header("Location") {
                if location.contains("evil.example") {
                    return AnalysisResult::vulnerable(
                        Confidence::High,
                        "Forged Location header from CRLF payload",
                        "Header injection: attacker-controlled redirect",
                    );
                }
            }
        }

        // Echo of the injected test header value back out.
        for value in response.headers.values() {
            if !payload.is_empty() && value.contains(payload) {
                return AnalysisResult::vulnerable(
                    Confidence::Medium,
                    "Injected header value reflected in response headers",
                    "Header values are echoed without sanitization",
                );
            }
        }

        common::no_signal(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::{capture, capture_with_header};

    #[test]
    fn test_forged_set_cookie() {
        let response =
            capture_with_header(200, "ok", "Set-Cookie", "injected=1; Path=/");
        let result = HeaderInjectionAnalyzer.analyze(
            &response,
            "test\r\nSet-Cookie: injected=1",
            Some(200),
            40,
        );
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_forged_location() {
        let response =
            capture_with_header(302, "", "Location", "https://evil.example/phish");
        let result = HeaderInjectionAnalyzer.analyze(
            &response,
            "test\nLocation: https://evil.example",
            Some(200),
            40,
        );
        assert!(result.vulnerable);
    }

    #[test]
    fn test_marker_header() {
        let response = capture_with_header(200, "ok", "X-Injected", "probe");
        let result =
            HeaderInjectionAnalyzer.analyze(&response, "test\r\nX-Injected: probe", None, 40);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_clean_response() {
        let response = capture(200, "{\"ok\": true}");
        let result = HeaderInjectionAnalyzer.analyze(
            &response,
            "test%0d%0aSet-Cookie:%20injected=1",
            Some(200),
            40,
        );
        assert!(!result.vulnerable);
    }
}
