//! Latency statistics
//!
//! Aggregates matched latencies into the summary shown at the top and
//! bottom of every report.

pub mod summary;
