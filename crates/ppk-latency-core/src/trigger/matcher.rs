//! Pairing of send triggers with receive triggers
//!
//! Send events are visited in their given order. For each one the matcher
//! scans every receive event that has not been consumed yet and picks the
//! closest one strictly after the send time and within `max_latency_ms`.
//! Ties keep the first candidate in scan order, i.e. the earliest receive
//! timestamp. A picked receive event is consumed and never offered again,
//! so pairing is one-to-one.
//!
//! The strategy is greedy and order-dependent; it does not search for the
//! assignment with the lowest total latency.
//!
//! Cost is O(S * R): every send event scans the whole receive arena.
//! Trigger counts are small compared to raw sample counts.

use serde::{Deserialize, Serialize};

use super::event::{Channel, TriggerEvent};
use crate::config::ConfigError;
use crate::diagnostics::MatchObserver;
use crate::error::AnalysisError;

/// Matching parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    max_latency_ms: f64,
}

impl MatchConfig {
    /// Create a config bounding eligible latencies to `max_latency_ms`
    ///
    /// # Errors
    /// Rejects non-finite or non-positive thresholds.
    pub fn new(max_latency_ms: f64) -> Result<Self, ConfigError> {
        if !max_latency_ms.is_finite() || max_latency_ms <= 0.0 {
            return Err(ConfigError::InvalidMaxLatency(max_latency_ms));
        }
        Ok(Self { max_latency_ms })
    }

    pub fn max_latency_ms(&self) -> f64 {
        self.max_latency_ms
    }
}

/// One matched send/receive pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyMeasurement {
    /// Position of the send event in the send sequence
    pub index: usize,
    /// Send trigger timestamp
    pub send_time: f64,
    /// Matched receive trigger timestamp
    pub receive_time: f64,
    /// `receive_time - send_time`
    pub latency: f64,
}

impl LatencyMeasurement {
    fn new(index: usize, send_time: f64, receive_time: f64) -> Self {
        Self {
            index,
            send_time,
            receive_time,
            latency: receive_time - send_time,
        }
    }
}

/// A send event that had no eligible receive event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedSend {
    /// Position of the send event in the send sequence
    pub index: usize,
    /// Send trigger timestamp
    pub send_time: f64,
}

/// Result of one matching run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Matched pairs, in send order
    pub measurements: Vec<LatencyMeasurement>,
    /// Send events left without a partner, in send order
    pub unmatched: Vec<UnmatchedSend>,
}

/// Receive timestamps with a parallel consumed flag per slot
#[derive(Debug)]
struct ReceiveArena {
    times: Vec<f64>,
    consumed: Vec<bool>,
}

impl ReceiveArena {
    fn new(events: &[TriggerEvent]) -> Self {
        Self {
            times: events.iter().map(|e| e.timestamp).collect(),
            consumed: vec![false; events.len()],
        }
    }

    /// Closest unconsumed receive slot after `send_time` within `max_latency_ms`
    fn best_candidate(&self, send_time: f64, max_latency_ms: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (slot, &receive_time) in self.times.iter().enumerate() {
            if self.consumed[slot] || receive_time <= send_time {
                continue;
            }
            let latency = receive_time - send_time;
            if latency > max_latency_ms {
                continue;
            }
            // Strict comparison keeps the first minimum in scan order
            if best.map_or(true, |(_, best_latency)| latency < best_latency) {
                best = Some((slot, latency));
            }
        }

        best.map(|(slot, _)| slot)
    }

    fn consume(&mut self, slot: usize) -> f64 {
        self.consumed[slot] = true;
        self.times[slot]
    }

    fn consumed_count(&self) -> usize {
        self.consumed.iter().filter(|&&c| c).count()
    }
}

/// Greedy nearest-neighbour trigger matcher
///
/// # Example
/// ```
/// use ppk_latency_core::diagnostics::NoopObserver;
/// use ppk_latency_core::trigger::event::{events_from_timestamps, Channel};
/// use ppk_latency_core::trigger::matcher::{MatchConfig, TriggerMatcher};
///
/// let matcher = TriggerMatcher::new(MatchConfig::new(100.0).unwrap());
/// let send = events_from_timestamps(Channel::Send, &[0.0, 10.0]);
/// let receive = events_from_timestamps(Channel::Receive, &[2.0, 12.0]);
///
/// let outcome = matcher.run(&send, &receive, &mut NoopObserver).unwrap();
/// assert_eq!(outcome.measurements.len(), 2);
/// assert_eq!(outcome.measurements[1].latency, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct TriggerMatcher {
    config: MatchConfig,
}

impl TriggerMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Pair send events with receive events
    ///
    /// Never fails: an empty input simply yields an empty outcome. Use
    /// [`TriggerMatcher::run`] to turn empty inputs and empty results into errors.
    pub fn pair(
        &self,
        send_events: &[TriggerEvent],
        receive_events: &[TriggerEvent],
        observer: &mut dyn MatchObserver,
    ) -> MatchOutcome {
        let max_latency_ms = self.config.max_latency_ms;
        let mut arena = ReceiveArena::new(receive_events);
        let mut outcome = MatchOutcome::default();

        for (index, send) in send_events.iter().enumerate() {
            match arena.best_candidate(send.timestamp, max_latency_ms) {
                Some(slot) => {
                    let receive_time = arena.consume(slot);
                    let measurement = LatencyMeasurement::new(index, send.timestamp, receive_time);
                    tracing::trace!(
                        index,
                        send_time = send.timestamp,
                        receive_time,
                        latency = measurement.latency,
                        "latency_matched"
                    );
                    observer.on_match(&measurement);
                    outcome.measurements.push(measurement);
                }
                None => {
                    let unmatched = UnmatchedSend {
                        index,
                        send_time: send.timestamp,
                    };
                    observer.on_unmatched(&unmatched);
                    outcome.unmatched.push(unmatched);
                }
            }
        }

        tracing::debug!(
            matched = outcome.measurements.len(),
            unmatched = outcome.unmatched.len(),
            receive_consumed = arena.consumed_count(),
            receive_total = receive_events.len(),
            "matching_finished"
        );

        outcome
    }

    /// Pair events, failing on empty channels or when nothing matched
    ///
    /// # Errors
    /// [`AnalysisError::EmptyChannel`] if either sequence is empty (checked
    /// before any matching), [`AnalysisError::NoValidPairs`] if no send event
    /// found a partner.
    pub fn run(
        &self,
        send_events: &[TriggerEvent],
        receive_events: &[TriggerEvent],
        observer: &mut dyn MatchObserver,
    ) -> Result<MatchOutcome, AnalysisError> {
        if send_events.is_empty() {
            return Err(AnalysisError::EmptyChannel {
                channel: Channel::Send,
            });
        }
        if receive_events.is_empty() {
            return Err(AnalysisError::EmptyChannel {
                channel: Channel::Receive,
            });
        }

        let outcome = self.pair(send_events, receive_events, observer);

        if outcome.measurements.is_empty() {
            return Err(AnalysisError::NoValidPairs {
                send_events: send_events.len(),
                receive_events: receive_events.len(),
                max_latency_ms: self.config.max_latency_ms,
            });
        }

        Ok(outcome)
    }
}
