#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for safegen binaries.
//!
//! Library crates only emit `tracing` events; binaries call [`init`] once to
//! install a formatting subscriber.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors that can occur while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level string is not a valid filter directive
    #[error("Invalid log level '{level}': {source}")]
    InvalidLevel {
        /// Level as given
        level: String,
        /// Underlying parse error
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// The log file could not be opened for appending
    #[error("Failed to open log file: {0}")]
    File(#[from] std::io::Error),
    /// A global subscriber was already installed
    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Build the filter for `level`, letting `RUST_LOG` take precedence when set
pub fn filter_for(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    parse_level(level)
}

fn parse_level(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level)
        .map_err(|source| LoggingError::InvalidLevel { level: level.to_string(), source })
}

/// Install the global `tracing` subscriber
///
/// # Arguments
///
/// * `level` - Filter directive (e.g. `info`, `debug`, `safegen_pipeline=trace`)
/// * `file` - Optional file to append log lines to instead of stderr
pub fn init(level: &str, file: Option<&Path>) -> Result<(), LoggingError> {
    let filter = filter_for(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match file {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init()
                .map_err(|e| LoggingError::Install(e.to_string()))
        }
        None => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| LoggingError::Install(e.to_string())),
    }
}
