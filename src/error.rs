// Error types module

use thiserror::Error;

/// A malformed request URL.
///
/// This is the only hard failure of request assembly: the remote URL is
/// missing, relative without a base, uses a scheme other than http/https, or
/// the inbound query string cannot be decoded. Everything else (bad option
/// tokens, unknown literals, wrong crop arity) degrades silently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed URL {url:?}: {message}")]
pub struct UrlError {
    /// The offending inbound path or URL, as received.
    pub url: String,
    /// Human-readable reason.
    pub message: String,
}

impl UrlError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Maps the error to an HTTP status code.
    ///
    /// A malformed URL is always the client's fault, so this is 400.
    pub fn to_http_status(&self) -> u16 {
        400
    }
}

/// Errors raised while loading or converting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnv(String),

    #[error("Source '{prefix}' has invalid base_url: {source}")]
    InvalidBaseUrl {
        prefix: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Source '{prefix}' has base_url '{base_url}' that cannot be used as a base")]
    RelativeBaseUrl { prefix: String, base_url: String },

    #[error("Source prefix '{prefix}' is invalid: {reason}")]
    InvalidPrefix { prefix: String, reason: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
