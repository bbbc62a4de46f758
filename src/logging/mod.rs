// Logging module for structured logging using the tracing crate

use std::error::Error;

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the tracing subscriber for structured logging
///
/// The level filter comes from `RUST_LOG` when set, otherwise from
/// `config.level`. Events are written to stderr, either as one JSON object
/// per line or in the human-readable pretty format, leaving stdout to the
/// binary's own output.
///
/// The library itself only emits events; binaries call this once at startup.
///
/// # Errors
///
/// Returns an error if the level filter does not parse or a global
/// subscriber is already installed.
///
/// # Examples
///
/// ```
/// use imgroute::config::LoggingConfig;
/// use imgroute::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.format {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
}
