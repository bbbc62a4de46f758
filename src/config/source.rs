//! Per-prefix source configuration.
//!
//! Sources are decoded in two phases. Serde first produces a
//! [`RawSourceConfig`] holding `base_url` as a plain string; then
//! [`SourceConfig::try_from_raw`] parses that string into a [`Url`]. A base
//! URL that fails to parse rejects the whole entry.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::options::Options;

/// Source entry exactly as it appears in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSourceConfig {
    /// Absolute base URL that relative remote references resolve against.
    /// Empty means remote URLs must already be absolute.
    #[serde(default)]
    pub base_url: String,

    /// Options applied before any path or query options.
    #[serde(default)]
    pub default_options: Options,
}

/// Validated source configuration, immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceConfig {
    pub base_url: Option<Url>,
    pub default_options: Options,
}

impl SourceConfig {
    pub fn new(base_url: Option<Url>, default_options: Options) -> Self {
        Self {
            base_url,
            default_options,
        }
    }

    /// Convert a decoded entry, validating its base URL.
    pub fn try_from_raw(prefix: &str, raw: RawSourceConfig) -> Result<Self, ConfigError> {
        let base_url = if raw.base_url.is_empty() {
            None
        } else {
            let url = Url::parse(&raw.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
                prefix: prefix.to_string(),
                source,
            })?;
            if url.cannot_be_a_base() {
                return Err(ConfigError::RelativeBaseUrl {
                    prefix: prefix.to_string(),
                    base_url: raw.base_url,
                });
            }
            Some(url)
        };

        Ok(Self {
            base_url,
            default_options: raw.default_options,
        })
    }
}
