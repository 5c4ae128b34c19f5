//! Count / mean / min / max over matched latencies

use serde::{Deserialize, Serialize};

use crate::trigger::matcher::LatencyMeasurement;

/// Aggregate statistics of the `latency` field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Number of measurements
    pub count: usize,
    /// Unweighted average latency (ms)
    pub mean: f64,
    /// Minimum latency (ms)
    pub min: f64,
    /// Maximum latency (ms)
    pub max: f64,
}

impl LatencySummary {
    /// Summarise a measurement list
    ///
    /// Returns `None` for an empty list instead of dividing by zero.
    pub fn from_measurements(measurements: &[LatencyMeasurement]) -> Option<Self> {
        let mut acc = SummaryAccumulator::new();
        for m in measurements {
            acc.record(m.latency);
        }
        acc.finish()
    }
}

/// Running accumulator behind [`LatencySummary`]
#[derive(Debug, Clone)]
pub struct SummaryAccumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl SummaryAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    /// Record one latency value
    pub fn record(&mut self, latency_ms: f64) {
        self.count += 1;
        self.sum += latency_ms;
        self.min = self.min.min(latency_ms);
        self.max = self.max.max(latency_ms);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Final statistics, or `None` if nothing was recorded
    pub fn finish(&self) -> Option<LatencySummary> {
        if self.count == 0 {
            return None;
        }
        Some(LatencySummary {
            count: self.count,
            mean: self.sum / self.count as f64,
            min: self.min,
            max: self.max,
        })
    }
}

impl Default for SummaryAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
