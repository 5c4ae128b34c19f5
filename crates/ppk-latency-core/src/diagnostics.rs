//! Diagnostics collaborators injected into the matcher
//!
//! The matcher itself never prints. It reports every match and every
//! unmatched send event to a [`MatchObserver`], which decides what to do
//! with them.

use crate::trigger::matcher::{LatencyMeasurement, UnmatchedSend};

/// Receives per-event notifications during a matching run
pub trait MatchObserver {
    /// A send event was paired with a receive event
    fn on_match(&mut self, _measurement: &LatencyMeasurement) {}

    /// A send event found no eligible receive event
    fn on_unmatched(&mut self, _unmatched: &UnmatchedSend) {}
}

/// Discards all notifications
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// Emits unmatched send events as `tracing` warnings
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn on_unmatched(&mut self, unmatched: &UnmatchedSend) {
        tracing::warn!(
            index = unmatched.index,
            send_time_ms = %format!("{:.3}", unmatched.send_time),
            "No matching RX trigger found for TX trigger"
        );
    }
}

/// Keeps a copy of every notification, for tests and post-run inspection
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    /// Number of successful matches seen
    pub matched: usize,
    /// Every unmatched send event, in send order
    pub unmatched: Vec<UnmatchedSend>,
}

impl MatchObserver for CollectingObserver {
    fn on_match(&mut self, _measurement: &LatencyMeasurement) {
        self.matched += 1;
    }

    fn on_unmatched(&mut self, unmatched: &UnmatchedSend) {
        self.unmatched.push(*unmatched);
    }
}
