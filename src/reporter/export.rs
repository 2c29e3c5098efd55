use anyhow::{Context, Result};
use std::fs;
use tera::{Context as TeraContext, Tera};

use crate::models::ScanReport;

pub struct JsonExporter;

impl JsonExporter {
    pub fn export(report: &ScanReport, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json).with_context(|| format!("Failed to write to {}", path))?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<ScanReport> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        let report: ScanReport = serde_json::from_str(&content)?;
        Ok(report)
    }
}

pub struct HtmlExporter;

impl HtmlExporter {
    pub fn export(report: &ScanReport, path: &str) -> Result<()> {
        let mut tera = Tera::default();
        tera.add_raw_template("report", TEMPLATE)?;

        let mut context = TeraContext::new();
        context.insert("scan_id", &report.scan_id);
        context.insert(
            "started_at",
            &report.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        context.insert("duration_s", &format!("{:.2}", report.duration_ms as f64 / 1000.0));
        context.insert("summary", &report.summary);
        context.insert(
            "findings",
            &report
                .summary
                .vulnerabilities
                .iter()
                .map(|v| HtmlFinding {
                    endpoint: v.endpoint.clone(),
                    vuln_type: v.vuln_type.to_string(),
                    severity: v.severity.to_string(),
                    confidence: v.confidence.to_string(),
                    payload: v.payload.chars().take(80).collect(),
                })
                .collect::<Vec<_>>(),
        );

        let html = tera.render("report", &context)?;
        fs::write(path, html).with_context(|| format!("Failed to write to {}", path))?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct HtmlFinding {
    endpoint: String,
    vuln_type: String,
    severity: String,
    confidence: String,
    payload: String,
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>vulnprobe report {{ scan_id }}</title>
<style>
body { font-family: -apple-system, sans-serif; margin: 2rem; color: #1a1a2e; }
h1 { font-size: 1.4rem; }
.cards { display: flex; gap: 1rem; margin: 1rem 0; }
.card { border: 1px solid #ddd; border-radius: 8px; padding: 0.8rem 1.2rem; }
.card .num { font-size: 1.6rem; font-weight: 700; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border: 1px solid #ddd; padding: 0.5rem 0.7rem; text-align: left; font-size: 0.9rem; }
th { background: #f5f5f5; }
.sev-CRITICAL { color: #b00020; font-weight: 700; }
.sev-HIGH { color: #d32f2f; }
.sev-MEDIUM { color: #f57c00; }
.sev-LOW { color: #1976d2; }
code { background: #f0f0f0; padding: 0.1rem 0.3rem; border-radius: 3px; }
</style>
</head>
<body>
<h1>Scan report {{ scan_id }}</h1>
<p>{{ started_at }} &middot; {{ duration_s }}s &middot; {{ summary.total_endpoints }} endpoints &middot; {{ summary.total_tests }} probes</p>
<div class="cards">
<div class="card"><div class="num">{{ summary.passed }}</div>passed</div>
<div class="card"><div class="num">{{ summary.failed }}</div>failed</div>
<div class="card"><div class="num">{{ summary.errors }}</div>errors</div>
</div>
{% if findings | length > 0 %}
<table>
<tr><th>Endpoint</th><th>Vulnerability</th><th>Severity</th><th>Confidence</th><th>Payload</th></tr>
{% for f in findings %}
<tr>
<td>{{ f.endpoint }}</td>
<td>{{ f.vuln_type }}</td>
<td class="sev-{{ f.severity }}">{{ f.severity }}</td>
<td>{{ f.confidence }}</td>
<td><code>{{ f.payload }}</code></td>
</tr>
{% endfor %}
</table>
{% else %}
<p>No vulnerabilities found.</p>
{% endif %}
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Confidence, EndpointScanResult, ScanOptions, Severity, TestRecord, Verdict, VulnType,
    };
    use chrono::Utc;

    fn sample_report() -> ScanReport {
        let mut report = ScanReport::new(ScanOptions::default());
        let mut result =
            EndpointScanResult::new("login".into(), "POST".into(), "https://x.test/login".into());
        result.push(TestRecord {
            vuln_type: VulnType::SqlInjection,
            severity: Severity::Critical,
            payload: "' OR '1'='1".into(),
            injection_point: "body:user".into(),
            method: "POST".into(),
            url: "https://x.test/login".into(),
            response_status: 200,
            response_time_ms: 52,
            response_size: 64,
            response_preview: "{\"token\":\"abc\"}".into(),
            verdict: Verdict::Fail,
            vulnerable: true,
            confidence: Confidence::High,
            indicators: vec!["Boolean injection returned success marker".into()],
            notes: "Possible authentication bypass via SQL injection".into(),
            baseline_status: Some(401),
            status_changed: true,
            timestamp: Utc::now(),
        });
        report.results.push(result);
        report.finalize(120);
        report
    }

    #[test]
    fn test_json_round_trip_preserves_counts_and_verdicts() {
        let report = sample_report();
        let dir = std::env::temp_dir().join("vulnprobe-test-export");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.json");
        let path = path.to_str().unwrap();

        JsonExporter::export(&report, path).unwrap();
        let restored = JsonExporter::load(path).unwrap();

        assert_eq!(restored.scan_id, report.scan_id);
        assert_eq!(restored.summary.failed, 1);
        assert_eq!(restored.results[0].records.len(), 1);
        assert_eq!(restored.results[0].records[0].verdict, Verdict::Fail);
        assert_eq!(
            restored.summary.vulnerabilities[0].vuln_type,
            VulnType::SqlInjection
        );
    }

    #[test]
    fn test_html_export_renders() {
        let report = sample_report();
        let dir = std::env::temp_dir().join("vulnprobe-test-export");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.html");
        let path = path.to_str().unwrap();

        HtmlExporter::export(&report, path).unwrap();
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("SQL Injection"));
        assert!(html.contains("CRITICAL"));
    }
}
