use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const RATE_LIMIT_HEADERS: &[&str] = &[
    "x-ratelimit-limit",
    "x-ratelimit-remaining",
    "x-rate-limit-limit",
    "ratelimit-limit",
    "retry-after",
];

const BENIGN_STATUSES: &[u16] = &[400, 404];

pub struct RateLimitAnalyzer;

impl Analyzer for RateLimitAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::RateLimitBypass
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

        // 429/503 without a WAF phrase is the server itself throttling.
        if response.status == 429 || response.status == 503 {
            return AnalysisResult::not_vulnerable(
                Confidence::High,
                format!("Rate limiting enforced (status {})", response.status),
                "GOOD: server throttles repeated requests",
            );
        }

        if let Some(rejected) = common::benign_rejection(response, BENIGN_STATUSES) {
            return rejected;
        }

        if response.is_success() {
            let has_limit_headers = RATE_LIMIT_HEADERS
                .iter()
                .any(|h| response.header(h).is_some());

            if has_limit_headers {
                return AnalysisResult::not_vulnerable(
                    Confidence::Medium,
                    "Rate limit headers present in response",
                    "Request accounting appears to be in place",
                );
            }

            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "No rate limiting signal on repeated probes",
                "Endpoint accepts rapid requests without throttling headers",
            );
        }

        common::no_signal(response)
    }
}
