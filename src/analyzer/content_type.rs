use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const XXE_SIGNATURES: &[&str] = &["root:x:0:0", "daemon:x:", "<!entity", "file:///etc/passwd"];

const BENIGN_STATUSES: &[u16] = &[400, 403, 404, 406, 415];

pub struct ContentTypeAnalyzer;

impl Analyzer for ContentTypeAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::ContentTypeManipulation
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

        if response.status == 415 {
            return AnalysisResult::not_vulnerable(
                Confidence::High,
                "Mismatched content type rejected (status 415)",
                "GOOD: server validates the declared content type",
            );
        }

        if let Some(rejected) = common::benign_rejection(response, BENIGN_STATUSES) {
            return rejected;
        }

        let body = response.body.to_lowercase();
        if payload.contains("<!ENTITY") {
            if let Some(signature) = common::match_signature(&body, XXE_SIGNATURES) {
                return common::signature_hit(signature, "XML external entity");
            }
        }

        if response.is_success()
            && response.content_type().contains("application/octet-stream")
        {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "Binary content returned where text was expected",
                "Content negotiation leaks unexpected representations",
            );
        }

        if response.is_success() {
            return AnalysisResult::vulnerable(
                Confidence::Low,
                "Mismatched body accepted without content-type validation",
                "Server processed a body that contradicts its content type",
            );
        }

        common::no_signal(response)
    }
}
