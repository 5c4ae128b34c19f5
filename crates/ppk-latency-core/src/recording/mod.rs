//! Recording ingestion
//!
//! Reads a PPK2 digital-channel export into one ordered sample sequence per
//! trigger channel. Header validation failures are fatal; individual rows
//! that cannot be parsed are skipped and counted.
//!
//! ## File Format
//!
//! ```text
//! Timestamp(ms),D0,D1,D2,D3,D4,D5,D6,D7
//! 0.000,0,0,0,0,0,0,0,0
//! 0.010,1,0,0,0,0,0,0,0
//! ```
//!
//! Only the configured timestamp, send and receive columns are read.

mod csv;

pub use csv::{parse_recording, read_recording};

use std::path::PathBuf;
use thiserror::Error;

use crate::trigger::event::Sample;

/// Rows between progress log events
pub const PROGRESS_INTERVAL_ROWS: usize = 100_000;

/// Errors that abort reading a recording
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read recording data: {0}")]
    Read(#[source] std::io::Error),

    #[error("Recording has no column headers")]
    MissingHeader,

    #[error("Recording must contain a '{column}' column (found: {found:?})")]
    MissingColumn { column: String, found: Vec<String> },
}

/// Per-channel samples read from one recording
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    /// Samples of the send (TX) channel, in row order
    pub send: Vec<Sample>,
    /// Samples of the receive (RX) channel, in row order
    pub receive: Vec<Sample>,
    /// Data rows accepted
    pub rows_parsed: usize,
    /// Data rows skipped as malformed
    pub rows_skipped: usize,
}

impl Recording {
    /// Build a recording from already separated channel samples
    pub fn from_samples(send: Vec<Sample>, receive: Vec<Sample>) -> Self {
        let rows_parsed = send.len().max(receive.len());
        Self {
            send,
            receive,
            rows_parsed,
            rows_skipped: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows_parsed == 0
    }
}
