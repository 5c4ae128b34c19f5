//! CLI argument parsing for ppk-latency

use clap::{Parser, ValueEnum};
use ppk_latency_core::config::AnalyzerConfig;
use ppk_latency_core::report::ReportFormat;
use ppk_latency_core::trigger::edge::EdgePolicy;
use std::path::PathBuf;

/// Output format for the latency report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown summary and table (default)
    Markdown,
    /// JSON for machine parsing
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ppk-latency")]
#[command(version)]
#[command(about = "Analyze PPK2 CSV recordings for UDP latency measurement", long_about = None)]
#[command(after_help = "\
The input CSV is expected to have columns:
    Timestamp(ms), D0, D1, D2, D3, D4, D5, D6, D7

Where:
    - D0: TX trigger channel (0 -> 1 transition indicates packet transmission)
    - D1: RX trigger channel (0 -> 1 transition indicates packet reception)

Examples:
    ppk-latency -i udp_softap.csv
    ppk-latency -i my_recording.csv -m 50.0 -o results.md")]
pub struct Cli {
    /// Input CSV file path (PPK2 recording)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Maximum expected latency in ms [default: 300.0]
    #[arg(short = 'm', long = "max-latency", value_name = "MS")]
    pub max_latency: Option<f64>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// JSON config file with column names and threshold
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Timestamp column header
    #[arg(long, value_name = "NAME")]
    pub timestamp_column: Option<String>,

    /// TX trigger column header
    #[arg(long, value_name = "NAME")]
    pub send_column: Option<String>,

    /// RX trigger column header
    #[arg(long, value_name = "NAME")]
    pub receive_column: Option<String>,

    /// Count a channel that is already high at the first sample as a trigger
    #[arg(long)]
    pub count_leading_high: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command line overrides on top of a base config
    pub fn apply_overrides(&self, mut config: AnalyzerConfig) -> AnalyzerConfig {
        if let Some(max_latency) = self.max_latency {
            config.max_latency_ms = max_latency;
        }
        if let Some(ref column) = self.timestamp_column {
            config.timestamp_column = column.clone();
        }
        if let Some(ref column) = self.send_column {
            config.send_column = column.clone();
        }
        if let Some(ref column) = self.receive_column {
            config.receive_column = column.clone();
        }
        if self.count_leading_high {
            config.edge_policy = EdgePolicy::AssumeLow;
        }
        config
    }
}
