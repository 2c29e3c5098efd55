use anyhow::{Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use tokio::sync::mpsc;

use vulnprobe::cli::{Cli, Commands};
use vulnprobe::models::{InjectLocation, ScanOptions, VulnType};
use vulnprobe::reporter::{ConsoleReporter, HtmlExporter, JsonExporter};
use vulnprobe::scanner::{DEFAULT_RETENTION, EndpointFileParser, ScanRegistry, Scanner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            endpoints,
            types,
            max_payloads,
            location,
            output,
            html,
            verbose,
        } => {
            run_scan(
                &endpoints,
                types.as_deref(),
                max_payloads,
                &location,
                output.as_deref(),
                html.as_deref(),
                verbose,
            )
            .await
        }
        Commands::Report {
            input,
            format,
            output,
        } => run_report(&input, &format, output.as_deref()),
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_scan(
    endpoints_path: &str,
    types: Option<&str>,
    max_payloads: usize,
    location: &str,
    output: Option<&str>,
    html: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let endpoints = EndpointFileParser::parse_file(endpoints_path)?;
    let options = build_options(types, max_payloads, location)?;
    let scanner = Scanner::new(options)?;

    let registry = ScanRegistry::new();
    let scan_id = format!("scan-{}", chrono::Utc::now().timestamp_millis());
    let total = endpoints.len();
    registry.create(&scan_id, total).await;

    let pb = create_progress_bar(total, verbose);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        scanner
            .scan_all(endpoints, move |event| {
                let _ = tx.send(event);
            })
            .await
    });

    while let Some(event) = rx.recv().await {
        pb.set_message(event.endpoint.clone());
        pb.inc(1);
        registry
            .update_progress(&scan_id, event.current, event.total)
            .await;
    }

    let report = handle.await?;
    registry.complete(&scan_id, report.clone()).await;
    pb.finish_with_message("Scan complete");

    let reporter = ConsoleReporter::new();
    reporter.print_summary(&report);
    reporter.print_findings(&report);
    if verbose {
        reporter.print_details(&report);
    }

    if let Some(path) = output {
        JsonExporter::export(&report, path)?;
        println!("JSON report written to {}", path);
    }
    if let Some(path) = html {
        HtmlExporter::export(&report, path)?;
        println!("HTML report written to {}", path);
    }

    registry.sweep(DEFAULT_RETENTION).await;
    Ok(())
}

fn run_report(input: &str, format: &str, output: Option<&str>) -> Result<()> {
    let report = JsonExporter::load(input)?;

    match format {
        "html" => {
            let path = output.unwrap_or("report.html");
            HtmlExporter::export(&report, path)?;
            println!("HTML report written to {}", path);
        }
        "console" => {
            let reporter = ConsoleReporter::new();
            reporter.print_summary(&report);
            reporter.print_findings(&report);
            reporter.print_details(&report);
        }
        other => bail!("Unknown report format: '{}'. Use 'html' or 'console'", other),
    }

    Ok(())
}

fn build_options(
    types: Option<&str>,
    max_payloads: usize,
    location: &str,
) -> Result<ScanOptions> {
    let scan_types = match types {
        None => None,
        Some(list) => {
            let mut set = BTreeSet::new();
            for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                match VulnType::parse(name) {
                    Some(t) => {
                        set.insert(t);
                    }
                    None => bail!("Unknown vulnerability type: '{}'", name),
                }
            }
            Some(set)
        }
    };

    let inject_location = InjectLocation::parse(location)
        .ok_or_else(|| anyhow::anyhow!("Invalid injection location: '{}'", location))?;

    Ok(ScanOptions {
        scan_types,
        max_payloads,
        inject_location,
    })
}

fn create_progress_bar(total: usize, verbose: bool) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);

    if verbose {
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
    } else {
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
    }

    pb
}
