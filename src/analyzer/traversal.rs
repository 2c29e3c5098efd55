use super::common;
use super::waf;
use super::Analyzer;
use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const FILE_SIGNATURES: &[&str] = &[
    "root:x:0:0",
    "daemon:x:",
    "bin:x:",
    "nobody:x:",
    "[boot loader]",
    "[fonts]",
    "[extensions]",
    "for 16-bit app support",
    "path=/usr",
    "ld_library_path",
];

const BENIGN_STATUSES: &[u16] = &[400, 403, 404];

pub struct PathTraversalAnalyzer;

impl Analyzer for PathTraversalAnalyzer {
    fn vuln_type(&self) -> VulnType {
        VulnType::PathTraversal
    }

    fn analyze(
        &self,
        response: &ResponseCapture,
        _payload: &str,
        baseline_status: Option<u16>,
        _elapsed_ms: u64,
    ) -> AnalysisResult {
        if let Some(blocked) = waf::check_blocked(response, self.vuln_type()) {
            return blocked;
        }

        if let Some(rejected) = common::benign_rejection(response, BENIGN_STATUSES) {
            return rejected;
        }

        let body = response.body.to_lowercase();
        if let Some(signature) = common::match_signature(&body, FILE_SIGNATURES) {
            return common::signature_hit(signature, "system file");
        }

        // Baseline said not-found, the traversal variant resolved. Known
        // false-positive source on unstable endpoints; kept as documented.
        if common::status_flip(response, baseline_status) {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                format!(
                    "Status changed from {} to {} after traversal payload",
                    baseline_status.unwrap_or(0),
                    response.status
                ),
                "Traversal payload resolved to a served resource",
            );
        }

        if response.is_success()
            && response.content_type().contains("application/octet-stream")
        {
            return AnalysisResult::vulnerable(
                Confidence::Medium,
                "Binary content returned where text was expected",
                "Possible raw file disclosure",
            );
        }

        common::no_signal(response)
    }
}
