use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const REJECT_STATUSES: &[u16] = &[413, 414, 431];

pub struct LargePayloadAnalyzer;

impl Analyzer for LargePayloadAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::LargePayload
    }

    fn analyze(
        &self,
        response: &ResponseCapture,
        _payload: &str,
        _baseline_status: Option<u16>,
        elapsed_ms: u64,
    ) -> AnalysisResult {
        if let Some(blocked) = waf::check_blocked(response, self.vuln_type()) {
            return blocked;
        }

        if REJECT_STATUSES.contains(&response.status) {
            return AnalysisResult::not_vulnerable(
                Confidence::High,
                format!("Oversized payload rejected (status {})", response.status),
                "GOOD: server enforces a request size limit",
            );
        }

        if (400..500).contains(&response.status) {
            return AnalysisResult::not_vulnerable(
                Confidence::Medium,
                format!("Oversized payload rejected (status {})", response.status),
                "Payload was rejected by input handling",
            );
        }

        if response.status == 500 {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "Unhandled server error (500) on oversized payload",
                "Server crashed or errored instead of rejecting the payload",
            );
        }

        if response.is_success() {
            let mut result = AnalysisResult::vulnerable(
                Confidence::Medium,
                "Server accepted an oversized payload without limits",
                "Missing request size limit invites resource exhaustion",
            );
            if elapsed_ms > common::TIMING_THRESHOLD_MS {
                result = result.with_indicator(format!(
                    "Slow processing: {}ms for oversized payload",
                    elapsed_ms
                ));
            }
            return result;
        }

        common::no_signal(response)
    }
}
