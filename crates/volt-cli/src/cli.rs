//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

/// Volt - Resolve company mentions and enrich them from public sources.
#[derive(Debug, Parser)]
#[command(name = "volt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Mentions file: a JSON array of strings or one mention per line ("-" for stdin)
    pub input: String,

    /// Where to write the validated JSON array
    #[arg(short, long, default_value = "result.json")]
    pub output: PathBuf,

    /// Also print the JSON result to stdout
    #[arg(long)]
    pub pretty: bool,

    /// Enable the web-search fallback (requires an API key)
    #[arg(long)]
    pub llm_fallback: bool,

    /// TOML configuration file
    #[arg(short, long, env = "VOLT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fuzzy-match threshold for clustering mentions (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Maximum number of companies enriched at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Run report format
    #[arg(short, long, value_enum, default_value = "table")]
    pub report: ReportFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// No report
    None,
}

impl Cli {
    /// Whether the input is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input == "-"
    }
}
