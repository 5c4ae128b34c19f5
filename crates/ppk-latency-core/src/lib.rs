//! PPK Latency Core - trigger edge detection, matching, and reporting
//!
//! This library derives UDP round-trip latency from a PPK2 digital-channel
//! recording. Rising edges on a send (TX) and a receive (RX) line are paired
//! one-to-one, and the resulting latency samples are summarised in a report.

pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod recording;
pub mod report;
pub mod stats;
pub mod trigger;

pub use analyzer::{Analysis, LatencyAnalyzer};
pub use config::{AnalyzerConfig, ConfigError};
pub use error::AnalysisError;
pub use report::{LatencyReport, ReportFormat};
pub use trigger::matcher::{LatencyMeasurement, TriggerMatcher};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date stamped by build.rs
pub const BUILD_DATE: &str = env!("BUILD_DATE");
