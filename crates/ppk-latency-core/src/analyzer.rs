//! End-to-end latency analysis of a recording
//!
//! Runs edge detection on both channels, checks that each produced at
//! least one trigger, then pairs them with the [`TriggerMatcher`]. Fatal
//! conditions are returned as [`AnalysisError`] before any report exists.

use serde::{Deserialize, Serialize};

use crate::config::{AnalyzerConfig, ConfigError};
use crate::diagnostics::MatchObserver;
use crate::error::AnalysisError;
use crate::recording::Recording;
use crate::report::LatencyReport;
use crate::trigger::edge::{detect_rising_edges, EdgePolicy};
use crate::trigger::event::{Channel, TriggerEvent};
use crate::trigger::matcher::{MatchConfig, MatchOutcome, TriggerMatcher};

/// Trigger events detected on both channels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectedTriggers {
    pub send: Vec<TriggerEvent>,
    pub receive: Vec<TriggerEvent>,
}

/// Successful analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Number of TX triggers detected
    pub send_events: usize,
    /// Number of RX triggers detected
    pub receive_events: usize,
    /// Matched pairs and unmatched diagnostics
    pub outcome: MatchOutcome,
}

impl Analysis {
    /// Build the report for this analysis
    pub fn report(&self) -> LatencyReport {
        LatencyReport::from_outcome(&self.outcome)
    }
}

/// Edge detection plus trigger matching
///
/// # Example
/// ```
/// use ppk_latency_core::analyzer::LatencyAnalyzer;
/// use ppk_latency_core::diagnostics::NoopObserver;
/// use ppk_latency_core::recording::Recording;
/// use ppk_latency_core::trigger::edge::EdgePolicy;
/// use ppk_latency_core::trigger::event::{Level, Sample};
/// use ppk_latency_core::trigger::matcher::MatchConfig;
///
/// let tx: [u8; 5] = [0, 1, 0, 0, 0];
/// let rx: [u8; 5] = [0, 0, 0, 1, 0];
/// let to_samples = |levels: &[u8]| -> Vec<Sample> {
///     levels.iter().enumerate()
///         .map(|(i, &l)| Sample::new(i as f64, Level::from(l == 1)))
///         .collect()
/// };
/// let recording = Recording::from_samples(to_samples(&tx), to_samples(&rx));
///
/// let analyzer = LatencyAnalyzer::new(MatchConfig::new(10.0).unwrap(), EdgePolicy::default());
/// let analysis = analyzer.analyze(&recording, &mut NoopObserver).unwrap();
/// assert_eq!(analysis.outcome.measurements[0].latency, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct LatencyAnalyzer {
    matcher: TriggerMatcher,
    edge_policy: EdgePolicy,
}

impl LatencyAnalyzer {
    pub fn new(match_config: MatchConfig, edge_policy: EdgePolicy) -> Self {
        Self {
            matcher: TriggerMatcher::new(match_config),
            edge_policy,
        }
    }

    /// Build an analyzer from validated settings
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.validate()?, config.edge_policy))
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    pub fn max_latency_ms(&self) -> f64 {
        self.matcher.config().max_latency_ms()
    }

    /// Detect trigger events on both channels of `recording`
    pub fn detect(&self, recording: &Recording) -> DetectedTriggers {
        let triggers = DetectedTriggers {
            send: detect_rising_edges(Channel::Send, self.edge_policy, &recording.send),
            receive: detect_rising_edges(Channel::Receive, self.edge_policy, &recording.receive),
        };
        tracing::info!(
            tx_triggers = triggers.send.len(),
            rx_triggers = triggers.receive.len(),
            "Detected trigger events"
        );
        triggers
    }

    /// Analyze a recording
    ///
    /// # Errors
    /// [`AnalysisError::EmptyChannel`] when a channel has no rising edge,
    /// [`AnalysisError::NoValidPairs`] when no send event could be matched.
    pub fn analyze(
        &self,
        recording: &Recording,
        observer: &mut dyn MatchObserver,
    ) -> Result<Analysis, AnalysisError> {
        let triggers = self.detect(recording);
        self.analyze_triggers(&triggers, observer)
    }

    /// Match already detected triggers
    pub fn analyze_triggers(
        &self,
        triggers: &DetectedTriggers,
        observer: &mut dyn MatchObserver,
    ) -> Result<Analysis, AnalysisError> {
        let outcome = self.matcher.run(&triggers.send, &triggers.receive, observer)?;

        tracing::info!(
            matched = outcome.measurements.len(),
            unmatched = outcome.unmatched.len(),
            max_latency_ms = self.max_latency_ms(),
            "Successfully matched packet pairs"
        );

        Ok(Analysis {
            send_events: triggers.send.len(),
            receive_events: triggers.receive.len(),
            outcome,
        })
    }
}
