//! Report building
//!
//! A [`LatencyReport`] holds the summary statistics, one row per matched
//! pair and the unmatched send diagnostics. It renders as markdown
//! ([`markdown`]) or JSON. Rendering is a pure function of the report.

pub mod markdown;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::summary::LatencySummary;
use crate::trigger::matcher::{LatencyMeasurement, MatchOutcome, UnmatchedSend};

/// Errors that can occur while rendering a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Markdown summary and table
    #[default]
    Markdown,
    /// Pretty-printed JSON
    Json,
}

/// Structured latency report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyReport {
    /// Aggregate statistics, `None` when there are no measurements
    pub summary: Option<LatencySummary>,
    /// Matched pairs in send order
    pub measurements: Vec<LatencyMeasurement>,
    /// Send events without a partner
    pub unmatched: Vec<UnmatchedSend>,
}

impl LatencyReport {
    pub fn new(measurements: Vec<LatencyMeasurement>, unmatched: Vec<UnmatchedSend>) -> Self {
        Self {
            summary: LatencySummary::from_measurements(&measurements),
            measurements,
            unmatched,
        }
    }

    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        Self::new(outcome.measurements.clone(), outcome.unmatched.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Render the report in `format`
    pub fn render(&self, format: ReportFormat) -> Result<String, ReportError> {
        match format {
            ReportFormat::Markdown => Ok(markdown::render(self)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
