//! Logging configuration types.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_LEVEL;

fn default_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for log aggregation (default)
    #[default]
    Json,
    /// Human-readable multi-line output for development
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level filter used when RUST_LOG is not set (default: info)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (default: json)
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}
