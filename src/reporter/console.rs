use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::models::{ScanReport, Severity, Verdict, VulnType};

pub struct ConsoleReporter;

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Vulnerability")]
    vuln_type: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Payload")]
    payload: String,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_summary(&self, report: &ScanReport) {
        let summary = &report.summary;

        println!("\n{}", "Summary".bold().underline());
        println!(
            "{} endpoints, {} probes in {:.2}s",
            summary.total_endpoints,
            summary.total_tests,
            report.duration_ms as f64 / 1000.0
        );
        println!(
            "  {}: {}  {}: {}  {}: {}",
            "PASS".green(),
            summary.passed,
            "FAIL".red(),
            summary.failed,
            "ERROR".yellow(),
            summary.errors
        );

        if summary.critical_count > 0 {
            println!("  {}: {}", "CRITICAL".red().bold(), summary.critical_count);
        }
        if summary.high_count > 0 {
            println!("  {}: {}", "HIGH".red(), summary.high_count);
        }
        if summary.medium_count > 0 {
            println!("  {}: {}", "MEDIUM".yellow(), summary.medium_count);
        }
        if summary.low_count > 0 {
            println!("  {}: {}", "LOW".blue(), summary.low_count);
        }
        println!();
    }

    pub fn print_findings(&self, report: &ScanReport) {
        if report.summary.vulnerabilities.is_empty() {
            println!("\n{}", "No vulnerabilities found.".green());
            return;
        }

        let rows: Vec<FindingRow> = report
            .summary
            .vulnerabilities
            .iter()
            .map(|v| FindingRow {
                endpoint: v.endpoint.clone(),
                vuln_type: v.vuln_type.to_string(),
                severity: Self::severity_cell(v.severity),
                confidence: v.confidence.to_string(),
                payload: Self::clip(&v.payload, 40),
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();

        println!("\n{}", table);
    }

    pub fn print_details(&self, report: &ScanReport) {
        let vulnerable: Vec<_> = report
            .results
            .iter()
            .filter(|r| r.failed > 0)
            .collect();

        if vulnerable.is_empty() {
            return;
        }

        println!("\n{}", "Findings".bold().underline());

        for result in vulnerable {
            println!(
                "\n{} {}",
                result.method.white().bold(),
                result.endpoint_name.white().bold()
            );

            for record in result.records.iter().filter(|r| r.verdict == Verdict::Fail) {
                println!(
                    "  [{}] {} via {}",
                    Self::severity_cell(record.severity),
                    record.vuln_type.to_string().yellow(),
                    record.injection_point.cyan()
                );
                for indicator in &record.indicators {
                    println!("    → {}", indicator);
                }
                let hint = Self::remediation(record.vuln_type);
                if !hint.is_empty() {
                    println!("    {}: {}", "Fix".cyan(), hint);
                }
            }
        }
    }

    fn severity_cell(severity: Severity) -> String {
        match severity {
            Severity::Critical => "CRITICAL".red().bold().to_string(),
            Severity::High => "HIGH".red().to_string(),
            Severity::Medium => "MEDIUM".yellow().to_string(),
            Severity::Low => "LOW".blue().to_string(),
        }
    }

    fn clip(s: &str, max: usize) -> String {
        if s.chars().count() <= max {
            s.to_string()
        } else {
            let head: String = s.chars().take(max).collect();
            format!("{}...", head)
        }
    }

    fn remediation(vuln_type: VulnType) -> &'static str {
        match vuln_type {
            VulnType::SqlInjection => "Use parameterized queries; never concatenate user input",
            VulnType::NoSqlInjection => "Reject operator keys in user input; cast query values",
            VulnType::CommandInjection => "Avoid shelling out with user input; use exec arrays",
            VulnType::Xss => "HTML-encode output and set a Content-Security-Policy",
            VulnType::PathTraversal => "Canonicalize paths and enforce a base-directory check",
            VulnType::HeaderInjection => "Strip CR/LF from values placed into response headers",
            VulnType::RateLimitBypass => "Apply per-client rate limits at the gateway",
            VulnType::LargePayload => "Enforce a request body size limit before parsing",
            VulnType::ContentTypeManipulation => "Validate Content-Type against an allowlist",
            VulnType::MalformedInput => "Return generic error messages; log details server-side",
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
