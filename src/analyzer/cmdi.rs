use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const OUTPUT_SIGNATURES: &[&str] = &[
    "uid=",
    "gid=",
    "groups=",
    "root:x:0:0",
    "/bin/bash",
    "/usr/bin",
    "volume in drive",
    "volume serial number",
    "directory of c:\\",
    "command not found",
    "is not recognized as an internal or external command",
    "sh: 1:",
    "/bin/sh:",
];

const BENIGN_STATUSES: &[u16] = &[400, 403, 404];

pub struct CommandInjectionAnalyzer;

impl Analyzer for CommandInjectionAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::CommandInjection
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
        if let Some(signature) = common::match_signature(&body, OUTPUT_SIGNATURES) {
            return common::signature_hit(signature, "command output");
        }

        // The echo probe prints a marker no normal response carries.
        if payload.contains("cmdi-probe") && body.contains("cmdi-probe") && response.is_success() {
            return AnalysisResult::vulnerable(
                Confidence::High,
                "Echo marker from injected command present in response",
                "Command injection confirmed via echoed marker",
            );
        }

        if common::has_delay_keyword(payload) && elapsed_ms > common::TIMING_THRESHOLD_MS {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                format!(
                    "Response delayed {}ms on sleep/ping payload (threshold {}ms)",
                    elapsed_ms,
                    common::TIMING_THRESHOLD_MS
                ),
                "Possible blind command injection (time-based)",
            );
        }

        if response.status == 500 {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "Unhandled server error (500) on command payload",
                "Server failed to handle shell metacharacters safely",
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
                "Behavioral change after command payload",
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
    fn test_id_output_signature() {
        let response = capture(200, "uid=33(www-data) gid=33(www-data) groups=33(www-data)");
        let result = CommandInjectionAnalyzer.analyze(&response, "`id`", Some(200), 40);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_echo_marker() {
        let response = capture(200, "output: cmdi-probe\n");
        let result =
            CommandInjectionAnalyzer.analyze(&response, "&& echo cmdi-probe", Some(200), 40);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_ping_delay() {
        let response = capture(200, "{}");
        let result =
            CommandInjectionAnalyzer.analyze(&response, "; ping -c 5 127.0.0.1", Some(200), 5100);
        assert!(result.vulnerable);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_clean() {
        let response = capture(200, "{\"ok\": true}");
        let result = CommandInjectionAnalyzer.analyze(&response, "| whoami", Some(200), 40);
        assert!(!result.vulnerable);
    }
}
