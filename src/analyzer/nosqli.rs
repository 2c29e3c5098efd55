use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const ERROR_SIGNATURES: &[&str] = &[
    "mongoerror",
    "mongoservererror",
    "cannot use $",
    "unknown operator",
    "unknown top level operator",
    "cast to objectid failed",
    "bsontypeerror",
    "bson field",
    "e11000 duplicate key",
    "$where",
    "couchdb error",
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

pub struct NoSqlInjectionAnalyzer;

impl NoSqlInjectionAnalyzer {
    fn is_operator_payload(payload: &str) -> bool {
        payload.contains("$gt")
            || payload.contains("$ne")
            || payload.contains("$or")
            || payload.contains("$regex")
            || payload.contains("||")
    }
}

impl Analyzer for NoSqlInjectionAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::NoSqlInjection
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
            return common::signature_hit(signature, "NoSQL error");
        }

        if Self::is_operator_payload(payload) && response.is_success() {
            if let Some(marker) = common::match_signature(&body, AUTH_MARKERS) {
                return AnalysisResult::vulnerable(
                    Confidence::High,
                    format!("Operator injection returned success marker \"{}\"", marker),
                    "Possible authentication bypass via NoSQL operator injection",
                );
            }
        }

        if common::has_delay_keyword(payload) && elapsed_ms > common::TIMING_THRESHOLD_MS {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                format!(
                    "Response delayed {}ms on $where sleep payload (threshold {}ms)",
                    elapsed_ms,
                    common::TIMING_THRESHOLD_MS
                ),
                "Possible server-side JavaScript execution",
            );
        }

        if response.status == 500 {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "Unhandled server error (500) on NoSQL payload",
                "Server failed to handle the injected operator safely",
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
                "Behavioral change after NoSQL payload",
            );
        }

        common::no_signal(response)
    }
}
