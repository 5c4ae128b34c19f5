//! Value types shared by the edge detector and the trigger matcher
//!
//! All timestamps are in the unit of the recording's timestamp column
//! (milliseconds for PPK2 exports).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two monitored trigger lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Pulsed by the transmitter when a packet is sent (D0 by default)
    Send,
    /// Pulsed by the receiver when a packet arrives (D1 by default)
    Receive,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Send => write!(f, "send (TX)"),
            Channel::Receive => write!(f, "receive (RX)"),
        }
    }
}

/// Digital level of a channel at one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    /// Parse a recorded level; only `0` and `1` are accepted
    pub fn from_digit(value: i64) -> Option<Self> {
        match value {
            0 => Some(Level::Low),
            1 => Some(Level::High),
            _ => None,
        }
    }

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// A single `(timestamp, level)` reading of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Sample timestamp
    pub timestamp: f64,
    /// Digital level at that timestamp
    pub level: Level,
}

impl Sample {
    pub fn new(timestamp: f64, level: Level) -> Self {
        Self { timestamp, level }
    }
}

/// A detected 0 -> 1 transition on a trigger channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Timestamp of the first high sample
    pub timestamp: f64,
    /// Channel the edge was seen on
    pub channel: Channel,
}

impl TriggerEvent {
    pub fn new(timestamp: f64, channel: Channel) -> Self {
        Self { timestamp, channel }
    }
}

/// Build a channel's event list from bare timestamps
///
/// Convenience for callers that already hold edge timestamps
/// (for example from another capture tool).
pub fn events_from_timestamps(channel: Channel, timestamps: &[f64]) -> Vec<TriggerEvent> {
    timestamps
        .iter()
        .map(|&t| TriggerEvent::new(t, channel))
        .collect()
}
