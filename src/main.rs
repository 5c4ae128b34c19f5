//! PPK Latency - UDP latency analysis from PPK2 recordings
//!
//! Entry point for the command line tool.

use anyhow::{Context, Result};
use clap::Parser;
use ppk_latency::cli::Cli;
use ppk_latency::diagnostics::TracingObserver;
use ppk_latency::output::{print_report, save_report};
use ppk_latency::recording::read_recording;
use ppk_latency::{AnalyzerConfig, LatencyAnalyzer, ReportFormat};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("ppk_latency={level}").parse()?)
                .add_directive(format!("ppk_latency_core={level}").parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let base = match cli.config {
        Some(ref path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    let config = cli.apply_overrides(base);
    let analyzer = LatencyAnalyzer::from_config(&config).context("Invalid configuration")?;

    info!(
        version = ppk_latency::VERSION,
        build_date = ppk_latency::BUILD_DATE,
        max_latency_ms = config.max_latency_ms,
        "Starting analysis"
    );

    let recording = read_recording(&cli.input, &config).context("Error reading CSV file")?;

    let analysis = analyzer.analyze(&recording, &mut TracingObserver)?;

    let format = ReportFormat::from(cli.format);
    let text = analysis.report().render(format)?;

    match cli.output {
        Some(ref path) => save_report(path, &text),
        None => print_report(&mut std::io::stdout().lock(), &text, format),
    }
}
