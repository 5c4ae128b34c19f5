//! Analysis configuration
//!
//! Column names, the latency threshold and the edge policy. Stored as JSON;
//! any field missing from the file falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::trigger::edge::EdgePolicy;
use crate::trigger::matcher::MatchConfig;

/// Default maximum accepted latency (ms)
pub const DEFAULT_MAX_LATENCY_MS: f64 = 300.0;

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Maximum latency must be a positive number of milliseconds, got {0}")]
    InvalidMaxLatency(f64),

    #[error("Send and receive channels must be different columns, both are '{0}'")]
    SameColumn(String),
}

fn default_max_latency_ms() -> f64 {
    DEFAULT_MAX_LATENCY_MS
}

fn default_timestamp_column() -> String {
    "Timestamp(ms)".to_string()
}

fn default_send_column() -> String {
    "D0".to_string()
}

fn default_receive_column() -> String {
    "D1".to_string()
}

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Upper bound on accepted latency (ms)
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: f64,
    /// Header of the timestamp column
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,
    /// Header of the TX trigger column
    #[serde(default = "default_send_column")]
    pub send_column: String,
    /// Header of the RX trigger column
    #[serde(default = "default_receive_column")]
    pub receive_column: String,
    /// Treatment of a channel that is already high at the first sample
    #[serde(default)]
    pub edge_policy: EdgePolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_latency_ms: default_max_latency_ms(),
            timestamp_column: default_timestamp_column(),
            send_column: default_send_column(),
            receive_column: default_receive_column(),
            edge_policy: EdgePolicy::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded config from disk");
        Ok(config)
    }

    /// Save config to disk, creating parent directories if needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, json).map_err(io_err)?;
        tracing::info!(path = %path.display(), "Config saved to disk");
        Ok(())
    }

    /// Check the settings and build the matcher configuration
    pub fn validate(&self) -> Result<MatchConfig, ConfigError> {
        if self.send_column == self.receive_column {
            return Err(ConfigError::SameColumn(self.send_column.clone()));
        }
        MatchConfig::new(self.max_latency_ms)
    }
}
