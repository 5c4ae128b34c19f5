//! Fatal analysis errors
//!
//! Recoverable per-event conditions are not errors; see
//! [`UnmatchedSend`](crate::trigger::matcher::UnmatchedSend).

use thiserror::Error;

use crate::trigger::event::Channel;

/// Conditions that abort an analysis before a report is built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No trigger events found on the {channel} channel (edge detection stage)")]
    EmptyChannel { channel: Channel },

    #[error(
        "No valid latency measurements could be calculated (matching stage): \
         {send_events} TX and {receive_events} RX triggers, none within {max_latency_ms} ms"
    )]
    NoValidPairs {
        send_events: usize,
        receive_events: usize,
        max_latency_ms: f64,
    },
}
