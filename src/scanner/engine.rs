use std::time::{Duration, Instant};

use chrono::Utc;

use crate::analyzer::{self, Analyzer};
use crate::http::HttpClient;
use crate::injector::Injector;
use crate::models::{
    AnalysisResult, Baseline, Confidence, EndpointDescriptor, EndpointScanResult, ResponseCapture,
    ScanOptions, ScanReport, TestRecord, Verdict,
};

use super::baseline::BaselineCollector;

/// Per-payload cap on injection variants, bounding request volume.
const VARIANT_CAP: usize = 2;
/// Pause between probes so the target is not hammered.
const PROBE_DELAY_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub current: usize,
    pub total: usize,
    pub endpoint: String,
}

/// Drives the full analyzer × payload × variant cross-product against each
/// endpoint, strictly sequentially. Transport failures surface as ERROR
/// records on the affected probes instead of aborting the scan.
pub struct Scanner {
    client: HttpClient,
    analyzers: Vec<Box<dyn Analyzer>>,
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            analyzers: analyzer::registry(),
            options,
        })
    }

    pub async fn scan_all<F>(
        &self,
        endpoints: Vec<EndpointDescriptor>,
        mut on_progress: F,
    ) -> ScanReport
    where
        F: FnMut(ProgressEvent),
    {
        let start = Instant::now();
        let mut report = ScanReport::new(self.options.clone());
        let total = endpoints.len();

        for (index, endpoint) in endpoints.iter().enumerate() {
            let result = self.scan_endpoint(endpoint).await;
            report.results.push(result);

            on_progress(ProgressEvent {
                current: index + 1,
                total,
                endpoint: endpoint.display_label(),
            });
        }

        report.finalize(start.elapsed().as_millis() as u64);
        report
    }

    async fn scan_endpoint(&self, endpoint: &EndpointDescriptor) -> EndpointScanResult {
        let mut result = EndpointScanResult::new(
            endpoint.name.clone(),
            endpoint.method.to_string(),
            endpoint.url.clone(),
        );

        let baseline = BaselineCollector::collect(&self.client, endpoint).await;

        for analyzer in self.selected_analyzers() {
            let payloads = analyzer.payloads();
            for payload in payloads.iter().take(self.options.max_payloads) {
                let variants = Injector::inject(endpoint, payload, self.options.inject_location);

                for variant in variants.into_iter().take(VARIANT_CAP) {
                    let response = self.client.send(&variant.endpoint).await;
                    let record = Self::build_record(
                        analyzer.as_ref(),
                        payload,
                        &variant.injection_point,
                        &variant.endpoint,
                        response,
                        baseline,
                    );
                    result.push(record);

                    tokio::time::sleep(Duration::from_millis(PROBE_DELAY_MS)).await;
                }
            }
        }

        result
    }

    fn selected_analyzers(&self) -> impl Iterator<Item = &Box<dyn Analyzer>> {
        self.analyzers
            .iter()
            .filter(|a| self.options.includes(a.vuln_type()))
    }

    fn build_record(
        analyzer: &dyn Analyzer,
        payload: &str,
        injection_point: &str,
        endpoint: &EndpointDescriptor,
        response: ResponseCapture,
        baseline: Option<Baseline>,
    ) -> TestRecord {
        let baseline_status = baseline.map(|b| b.status);

        // Transport failures short-circuit analysis: nothing to interpret.
        let (verdict, analysis) = if response.is_error() {
            let detail = response
                .error_detail
                .clone()
                .unwrap_or_else(|| "request failed".to_string());
            (
                Verdict::Error,
                AnalysisResult::not_vulnerable(
                    Confidence::Low,
                    format!(
                        "{}: {}",
                        response
                            .error
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "Request failed".to_string()),
                        detail
                    ),
                    "Probe could not be evaluated",
                ),
            )
        } else {
            let analysis = analyzer.analyze(
                &response,
                payload,
                baseline_status,
                response.duration_ms,
            );
            let verdict = if analysis.vulnerable {
                Verdict::Fail
            } else {
                Verdict::Pass
            };
            (verdict, analysis)
        };

        TestRecord {
            vuln_type: analyzer.vuln_type(),
            severity: analyzer.severity(),
            payload: payload.to_string(),
            injection_point: injection_point.to_string(),
            method: endpoint.method.to_string(),
            url: HttpClient::full_url(endpoint),
            response_status: response.status,
            response_time_ms: response.duration_ms,
            response_size: response.size,
            response_preview: response.preview(),
            verdict,
            vulnerable: analysis.vulnerable,
            confidence: analysis.confidence,
            indicators: analysis.indicators,
            notes: analysis.notes,
            baseline_status,
            status_changed: baseline_status
                .map(|b| b != response.status)
                .unwrap_or(false),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InjectLocation, VulnType};
    use std::collections::BTreeSet;

    fn scanner_with(options: ScanOptions) -> Scanner {
        Scanner::new(options).expect("client should build")
    }

    #[test]
    fn test_analyzer_selection_default_is_all_ten() {
        let scanner = scanner_with(ScanOptions::default());
        assert_eq!(scanner.selected_analyzers().count(), 10);
    }

    #[test]
    fn test_analyzer_selection_restricted() {
        let mut set = BTreeSet::new();
        set.insert(VulnType::Xss);
        set.insert(VulnType::SqlInjection);
        let scanner = scanner_with(ScanOptions {
            scan_types: Some(set),
            ..Default::default()
        });

        let types: Vec<VulnType> = scanner
            .selected_analyzers()
            .map(|a| a.vuln_type())
            .collect();
        assert_eq!(types, vec![VulnType::SqlInjection, VulnType::Xss]);
    }

    #[test]
    fn test_probe_volume_bound() {
        // One class, maxPayloads=3, variant cap 2: at most 6 probes per
        // endpoint.
        let mut set = BTreeSet::new();
        set.insert(VulnType::SqlInjection);
        let options = ScanOptions {
            scan_types: Some(set),
            max_payloads: 3,
            inject_location: InjectLocation::All,
        };
        let scanner = scanner_with(options);

        let endpoint =
            EndpointDescriptor::new("users", crate::models::HttpMethod::Get, "https://x.test/u");
        let mut probes = 0;
        for analyzer in scanner.selected_analyzers() {
            for payload in analyzer.payloads().iter().take(scanner.options.max_payloads) {
                let variants =
                    Injector::inject(&endpoint, payload, scanner.options.inject_location);
                probes += variants.len().min(VARIANT_CAP);
            }
        }
        assert!(probes <= 3 * VARIANT_CAP);
    }

    #[test]
    fn test_error_record_short_circuits_analysis() {
        let scanner = scanner_with(ScanOptions::default());
        let endpoint =
            EndpointDescriptor::new("users", crate::models::HttpMethod::Get, "https://x.test/u");
        let response = ResponseCapture::transport_failure(
            crate::models::TransportError::TimedOut,
            "operation timed out".to_string(),
            15000,
        );

        let record = Scanner::build_record(
            scanner.analyzers[0].as_ref(),
            "' OR 1=1--",
            "query:q (added)",
            &endpoint,
            response,
            None,
        );

        assert_eq!(record.verdict, Verdict::Error);
        assert!(!record.vulnerable);
        assert_eq!(record.response_status, 0);
        assert!(record.indicators[0].contains("timed out"));
    }

    #[test]
    fn test_pass_fail_folding() {
        let scanner = scanner_with(ScanOptions::default());
        let endpoint =
            EndpointDescriptor::new("users", crate::models::HttpMethod::Get, "https://x.test/u");

        let clean = ResponseCapture::new(200, Default::default(), "{}".to_string(), 30);
        let record = Scanner::build_record(
            scanner.analyzers[0].as_ref(),
            "' OR 1=1--",
            "query:q (added)",
            &endpoint,
            clean,
            Some(Baseline {
                status: 200,
                duration_ms: 30,
                content_length: 2,
            }),
        );
        assert_eq!(record.verdict, Verdict::Pass);
        assert!(!record.status_changed);

        let leaky = ResponseCapture::new(
            500,
            Default::default(),
            "You have an error in your SQL syntax".to_string(),
            30,
        );
        let record = Scanner::build_record(
            scanner.analyzers[0].as_ref(),
            "' OR 1=1--",
            "query:q (added)",
            &endpoint,
            leaky,
            Some(Baseline {
                status: 200,
                duration_ms: 30,
                content_length: 2,
            }),
        );
        assert_eq!(record.verdict, Verdict::Fail);
        assert!(record.status_changed);
        assert_eq!(record.baseline_status, Some(200));
    }
}
