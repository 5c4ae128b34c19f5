//! PPK Latency - UDP latency analysis from PPK2 digital recordings
//!
//! This library re-exports the edge detection, trigger matching and
//! reporting functionality from `ppk-latency-core`, plus the command line
//! surface of the `ppk-latency` binary.

pub mod cli;
pub mod output;

pub use ppk_latency_core::{analyzer, config, diagnostics, error, recording, report, stats, trigger};

pub use ppk_latency_core::{
    Analysis, AnalysisError, AnalyzerConfig, LatencyAnalyzer, LatencyMeasurement, LatencyReport,
    ReportFormat, TriggerMatcher,
};
pub use ppk_latency_core::{BUILD_DATE, VERSION};
