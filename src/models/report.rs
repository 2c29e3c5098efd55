use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{Confidence, Severity, VulnType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
    Error,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectLocation {
    Query,
    Body,
    Header,
    Path,
    All,
}

impl InjectLocation {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "query" => Some(InjectLocation::Query),
            "body" => Some(InjectLocation::Body),
            "header" => Some(InjectLocation::Header),
            "path" => Some(InjectLocation::Path),
            "all" => Some(InjectLocation::All),
            _ => None,
        }
    }
}

impl Default for InjectLocation {
    fn default() -> Self {
        InjectLocation::All
    }
}

/// Knobs for one scan run. All optional from the caller's point of view;
/// defaults cover the full analyzer registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    pub scan_types: Option<BTreeSet<VulnType>>,
    pub max_payloads: usize,
    pub inject_location: InjectLocation,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            scan_types: None,
            max_payloads: 5,
            inject_location: InjectLocation::All,
        }
    }
}

impl ScanOptions {
    pub fn includes(&self, vuln_type: VulnType) -> bool {
        match &self.scan_types {
            Some(set) => set.contains(&vuln_type),
            None => true,
        }
    }
}

/// Full record of one probe: what was sent, what came back, and how the
/// analyzer judged it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub vuln_type: VulnType,
    pub severity: Severity,
    pub payload: String,
    pub injection_point: String,
    pub method: String,
    pub url: String,
    pub response_status: u16,
    pub response_time_ms: u64,
    pub response_size: usize,
    pub response_preview: String,
    pub verdict: Verdict,
    pub vulnerable: bool,
    pub confidence: Confidence,
    pub indicators: Vec<String>,
    pub notes: String,
    pub baseline_status: Option<u16>,
    pub status_changed: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointScanResult {
    pub endpoint_name: String,
    pub method: String,
    pub url: String,
    pub records: Vec<TestRecord>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl EndpointScanResult {
    pub fn new(endpoint_name: String, method: String, url: String) -> Self {
        Self {
            endpoint_name,
            method,
            url,
            records: Vec::new(),
            total: 0,
            passed: 0,
            failed: 0,
            errors: 0,
        }
    }

    pub fn push(&mut self, record: TestRecord) {
        self.total += 1;
        match record.verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
            Verdict::Error => self.errors += 1,
        }
        self.records.push(record);
    }
}

/// One FAIL record flattened into the report summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityFinding {
    pub endpoint: String,
    pub vuln_type: VulnType,
    pub severity: Severity,
    pub payload: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_endpoints: usize,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub vulnerabilities: Vec<VulnerabilityFinding>,
}

impl ScanSummary {
    pub fn from_results(results: &[EndpointScanResult]) -> Self {
        let mut summary = Self {
            total_endpoints: results.len(),
            total_tests: 0,
            passed: 0,
            failed: 0,
            errors: 0,
            critical_count: 0,
            high_count: 0,
            medium_count: 0,
            low_count: 0,
            vulnerabilities: Vec::new(),
        };

        for result in results {
            summary.total_tests += result.total;
            summary.passed += result.passed;
            summary.failed += result.failed;
            summary.errors += result.errors;

            for record in &result.records {
                if record.verdict != Verdict::Fail {
                    continue;
                }
                match record.severity {
                    Severity::Critical => summary.critical_count += 1,
                    Severity::High => summary.high_count += 1,
                    Severity::Medium => summary.medium_count += 1,
                    Severity::Low => summary.low_count += 1,
                }
                summary.vulnerabilities.push(VulnerabilityFinding {
                    endpoint: result.endpoint_name.clone(),
                    vuln_type: record.vuln_type,
                    severity: record.severity,
                    payload: record.payload.clone(),
                    confidence: record.confidence,
                });
            }
        }

        summary
    }
}

/// Created at scan start, filled endpoint by endpoint, finalized once the
/// last endpoint completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub options: ScanOptions,
    pub results: Vec<EndpointScanResult>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn new(options: ScanOptions) -> Self {
        let started_at = Utc::now();
        Self {
            scan_id: format!("scan-{}", started_at.timestamp_millis()),
            started_at,
            duration_ms: 0,
            options,
            results: Vec::new(),
            summary: ScanSummary::from_results(&[]),
        }
    }

    pub fn finalize(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.summary = ScanSummary::from_results(&self.results);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_record(verdict: Verdict, severity: Severity) -> TestRecord {
        TestRecord {
            vuln_type: VulnType::SqlInjection,
            severity,
            payload: "' OR '1'='1".to_string(),
            injection_point: "query:id".to_string(),
            method: "GET".to_string(),
            url: "https://x.test/users".to_string(),
            response_status: 200,
            response_time_ms: 40,
            response_size: 120,
            response_preview: "{}".to_string(),
            verdict,
            vulnerable: verdict == Verdict::Fail,
            confidence: Confidence::High,
            indicators: vec!["test".to_string()],
            notes: String::new(),
            baseline_status: Some(200),
            status_changed: false,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_endpoint_result_counts() {
        let mut result =
            EndpointScanResult::new("users".into(), "GET".into(), "https://x.test/users".into());
        result.push(mock_record(Verdict::Pass, Severity::Critical));
        result.push(mock_record(Verdict::Fail, Severity::Critical));
        result.push(mock_record(Verdict::Error, Severity::Critical));

        assert_eq!(result.total, 3);
        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors, 1);
    }

    #[test]
    fn test_summary_flattens_failures() {
        let mut result =
            EndpointScanResult::new("users".into(), "GET".into(), "https://x.test/users".into());
        result.push(mock_record(Verdict::Fail, Severity::Critical));
        result.push(mock_record(Verdict::Fail, Severity::Medium));
        result.push(mock_record(Verdict::Pass, Severity::High));

        let summary = ScanSummary::from_results(&[result]);
        assert_eq!(summary.total_tests, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.vulnerabilities.len(), 2);
        assert_eq!(summary.critical_count, 1);
        assert_eq!(summary.medium_count, 1);
        assert_eq!(summary.vulnerabilities[0].endpoint, "users");
    }

    #[test]
    fn test_report_round_trip() {
        let mut report = ScanReport::new(ScanOptions::default());
        let mut result =
            EndpointScanResult::new("users".into(), "GET".into(), "https://x.test/users".into());
        result.push(mock_record(Verdict::Fail, Severity::Critical));
        result.push(mock_record(Verdict::Pass, Severity::Critical));
        report.results.push(result);
        report.finalize(1234);

        let json = serde_json::to_string(&report).unwrap();
        let restored: ScanReport = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.scan_id, report.scan_id);
        assert_eq!(restored.duration_ms, 1234);
        assert_eq!(restored.results.len(), 1);
        assert_eq!(restored.results[0].total, 2);
        assert_eq!(restored.results[0].failed, 1);
        assert_eq!(restored.results[0].records[0].verdict, Verdict::Fail);
        assert_eq!(restored.summary.vulnerabilities.len(), 1);
    }

    #[test]
    fn test_options_includes() {
        let all = ScanOptions::default();
        assert!(all.includes(VulnType::Xss));

        let mut set = BTreeSet::new();
        set.insert(VulnType::SqlInjection);
        let narrow = ScanOptions {
            scan_types: Some(set),
            ..Default::default()
        };
        assert!(narrow.includes(VulnType::SqlInjection));
        assert!(!narrow.includes(VulnType::Xss));
    }
}
