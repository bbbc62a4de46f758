// Configuration module
//
// A configuration file maps URL path prefixes to source settings:
//
//   sources:
//     "/cdn/":
//       base_url: "https://cdn.example.com/assets/"
//       default_options:
//         quality: 80
//     "/thumbs/":
//       default_options: { width: 150, height: 150 }
//   query_forwarding: raw
//   logging:
//     level: info
//     format: json

pub mod logging;
pub mod source;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::router::Registry;

pub use logging::{LogFormat, LoggingConfig};
pub use source::{RawSourceConfig, SourceConfig};

/// What part of the inbound query string is forwarded to the remote server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryForwarding {
    /// Forward the raw inbound query verbatim, option keys included (default)
    #[default]
    Raw,
    /// Forward only keys that are not image options
    StripOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: BTreeMap<String, RawSourceConfig>,
    #[serde(default)]
    pub query_forwarding: QueryForwarding,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub generation: u64, // Config version, increments on reload
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnv(var_name.to_string()));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        let mut config: Config = serde_yaml::from_str(&substituted)?;
        config.generation = 0;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(json)?;
        config.generation = 0;
        Ok(config)
    }

    /// Load from a file; `.json` files are decoded as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml_with_env(&contents)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for prefix in self.sources.keys() {
            if prefix.is_empty() {
                return Err(ConfigError::InvalidPrefix {
                    prefix: prefix.clone(),
                    reason: "prefix cannot be empty".to_string(),
                });
            }
            if !prefix.starts_with('/') {
                return Err(ConfigError::InvalidPrefix {
                    prefix: prefix.clone(),
                    reason: "prefix must start with /".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate every source and build an immutable registry snapshot.
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        self.validate()?;

        let mut sources = BTreeMap::new();
        for (prefix, raw) in &self.sources {
            let source = SourceConfig::try_from_raw(prefix, raw.clone())?;
            sources.insert(prefix.clone(), source);
        }
        Ok(Registry::new(sources))
    }
}
