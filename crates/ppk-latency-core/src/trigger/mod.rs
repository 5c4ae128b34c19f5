//! Trigger processing
//!
//! This module turns raw channel levels into latency samples:
//! - Value types for samples and trigger events ([`event`])
//! - Rising-edge detection per channel ([`edge`])
//! - Greedy one-to-one send/receive pairing ([`matcher`])

pub mod edge;
pub mod event;
pub mod matcher;
