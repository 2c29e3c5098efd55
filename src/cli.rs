use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vulnprobe")]
#[command(version, about = "Adversarial payload scanner for HTTP APIs")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Scan {
        /// JSON endpoints file (array of {name, method, url, headers, body, queryParams})
        #[arg(short, long)]
        endpoints: String,

        /// Comma-separated vulnerability types (default: all ten)
        #[arg(short, long)]
        types: Option<String>,

        /// Payloads per analyzer
        #[arg(short, long, default_value = "5")]
        max_payloads: usize,

        /// Injection location: query, body, header, path or all
        #[arg(short, long, default_value = "all")]
        location: String,

        /// Write the full report as JSON
        #[arg(short, long)]
        output: Option<String>,

        /// Write an HTML report
        #[arg(long)]
        html: Option<String>,

        #[arg(short, long)]
        verbose: bool,
    },

    Report {
        /// Previously exported JSON report
        #[arg(short, long)]
        input: String,

        #[arg(short, long, default_value = "html")]
        format: String,

        #[arg(short, long)]
        output: Option<String>,
    },
}
