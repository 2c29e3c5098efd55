use crate::models::{AnalysisResult, Confidence, ResponseCapture, VulnType};

const BLOCK_STATUSES: &[u16] = &[403, 406, 429];

const BLOCK_PHRASES: &[&str] = &[
    "access denied",
    "request blocked",
    "blocked by",
    "security policy",
    "web application firewall",
    "forbidden by rule",
    "mod_security",
    "request rejected",
    "not acceptable",
    "suspicious activity",
    "your request has been denied",
];

const PROXY_FINGERPRINTS: &[&str] = &[
    "attention required! | cloudflare",
    "cloudflare ray id",
    "cf-ray",
    "incapsula incident id",
    "sucuri website firewall",
    "akamai ghost",
    "reference #18.",
    "imperva",
    "perimeterx",
    "request unsuccessful. incapsula",
];

/// First check every analyzer runs: a blocked probe says nothing about the
/// application behind the proxy, so it short-circuits as not vulnerable.
/// 503 counts as a block status only for the rate-limit analyzer.
pub fn check_blocked(response: &ResponseCapture, vuln_type: VulnType) -> Option<AnalysisResult> {
    let body = response.body.to_lowercase();

    let status_match = BLOCK_STATUSES.contains(&response.status)
        || (vuln_type == VulnType::RateLimitBypass && response.status == 503);

    if status_match {
        if let Some(phrase) = BLOCK_PHRASES.iter().find(|p| body.contains(*p)) {
            return Some(AnalysisResult::not_vulnerable(
                Confidence::High,
                format!(
                    "Request blocked by WAF (status {}, matched \"{}\")",
                    response.status, phrase
                ),
                "WAF or security middleware intercepted the payload",
            ));
        }
    }

    if let Some(fingerprint) = PROXY_FINGERPRINTS.iter().find(|p| body.contains(*p)) {
        return Some(AnalysisResult::not_vulnerable(
            Confidence::High,
            format!("Request blocked by edge proxy (matched \"{}\")", fingerprint),
            "WAF or security middleware intercepted the payload",
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn capture(status: u16, body: &str) -> ResponseCapture {
        ResponseCapture::new(status, BTreeMap::new(), body.to_string(), 10)
    }

    #[test]
    fn test_block_status_with_phrase() {
        let response = capture(403, "Access Denied by security policy");
        let result = check_blocked(&response, VulnType::SqlInjection).unwrap();
        assert!(!result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.indicators[0].contains("blocked"));
    }

    #[test]
    fn test_block_status_without_phrase_passes_through() {
        let response = capture(403, "{\"error\": \"missing token\"}");
        assert!(check_blocked(&response, VulnType::SqlInjection).is_none());
    }

    #[test]
    fn test_proxy_fingerprint_matches_any_status() {
        let response = capture(200, "<title>Attention Required! | Cloudflare</title>");
        let result = check_blocked(&response, VulnType::Xss).unwrap();
        assert!(!result.vulnerable);
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_503_only_blocks_for_rate_limit() {
        let response = capture(503, "request rejected by firewall");
        assert!(check_blocked(&response, VulnType::SqlInjection).is_none());
        assert!(check_blocked(&response, VulnType::RateLimitBypass).is_some());
    }
}
