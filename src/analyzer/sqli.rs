use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const ERROR_SIGNATURES: &[&str] = &[
    "you have an error in your sql syntax",
    "sql syntax",
    "mysql_fetch",
    "warning: mysql",
    "mariadb server version",
    "unclosed quotation mark",
    "quoted string not properly terminated",
    "odbc sql server driver",
    "sqlstate",
    "syntax error at or near",
    "pg_query",
    "sqlite error",
    "sqlite3::",
    "ora-00933",
    "ora-01756",
];

const AUTH_MARKERS: &[&str] = &[
    "\"token\"",
    "\"access_token\"",
    "\"session\"",
    "\"jwt\"",
    "\"success\":true",
    "\"success\": true",
    "logged in",
    "welcome",
];

const BENIGN_STATUSES: &[u16] = &[400, 403, 404];

pub struct SqlInjectionAnalyzer;

impl SqlInjectionAnalyzer {
    fn is_bypass_payload(payload: &str) -> bool {
        let lower = payload.to_lowercase();
        lower.contains("1=1")
            || lower.contains("'1'='1")
            || lower.contains("\"\"=\"")
            || lower.contains("'x'='x")
            || lower.contains("admin'--")
    }
}

impl Analyzer for SqlInjectionAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::SqlInjection
    }

    fn analyze(
        &self,
        response: &ResponseCapture,
        payload: &str,
        baseline_status: Option<u16>,
        elapsed_ms: u64,
    ) -> AnalysisResult {
        if let Some(blocked) = waf::check_blocked(response, self.vuln_type()) {
            return blocked;
        }

        if let Some(rejected) = common::benign_rejection(response, BENIGN_STATUSES) {
            return rejected;
        }

        let body = response.body.to_lowercase();
        if let Some(signature) = common::match_signature(&body, ERROR_SIGNATURES) {
            return common::signature_hit(signature, "SQL error");
        }

        if Self::is_bypass_payload(payload) && response.is_success() {
            if let Some(marker) = common::match_signature(&body, AUTH_MARKERS) {
                return AnalysisResult::vulnerable(
                    Confidence::High,
                    format!("Boolean injection returned success marker \"{}\"", marker),
                    "Possible authentication bypass via SQL injection",
                );
            }
        }

        if common::has_delay_keyword(payload) && elapsed_ms > common::TIMING_THRESHOLD_MS {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                format!(
                    "Response delayed {}ms on time-based payload (threshold {}ms)",
                    elapsed_ms,
                    common::TIMING_THRESHOLD_MS
                ),
                "Possible time-based SQL injection",
            );
        }

        if response.status == 500 {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "Unhandled server error (500) on SQL payload",
                "Server failed to handle the injected value safely",
            );
        }

        if common::status_flip(response, baseline_status) {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                format!(
                    "Status changed from {} to {} after injection",
                    baseline_status.unwrap_or(0),
                    response.status
                ),
                "Behavioral change after SQL payload",
            );
        }

        common::no_signal(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::capture;

    #[test]
    fn test_error_signature_high_confidence() {
        let response = capture(
            500,
            "You have an error in your SQL syntax near ''1'='1' at line 1",
        );
        let result = SqlInjectionAnalyzer.analyze(&response, "' OR '1'='1", Some(200), 40);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_login_bypass_scenario() {
        let response = capture(200, "{\"token\":\"abc\",\"user\":\"admin\"}");
        let result = SqlInjectionAnalyzer.analyze(&response, "' OR '1'='1", Some(401), 40);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.notes.contains("authentication bypass"));
    }

    #[test]
    fn test_time_based_inference() {
        let response = capture(200, "{}");
        let result = SqlInjectionAnalyzer.analyze(&response, "1' AND SLEEP(5)--", Some(200), 5200);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_slow_response_without_delay_keyword_is_clean() {
        let response = capture(200, "{}");
        let result = SqlInjectionAnalyzer.analyze(&response, "' OR '1'='1", Some(200), 5200);
        assert!(!result.vulnerable);
    }

    #[test]
    fn test_benign_rejection() {
        let response = capture(400, "{\"error\": \"invalid input\"}");
        let result = SqlInjectionAnalyzer.analyze(&response, "' OR 1=1--", Some(200), 40);
        assert!(!result.vulnerable);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_clean_response() {
        let response = capture(200, "{\"items\": []}");
        let result = SqlInjectionAnalyzer.analyze(&response, "' UNION SELECT NULL--", Some(200), 40);
        assert!(!result.vulnerable);
        assert!(result.indicators[0].contains("200"));
    }
}
