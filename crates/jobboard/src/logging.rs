//! Global log/tracing setup.
//!
//! Library code logs through the `log` facade. [`init`] forwards those
//! records into a `tracing` subscriber so they share one filter and one
//! output format with any spans the host application emits.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("A global logger is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Installs the global subscriber, then forwards `log` records into it.
/// `RUST_LOG`, when set, overrides the configured level.
///
/// If a `tracing` subscriber is already installed nothing is changed. If
/// only a `log` logger is already installed, the subscriber stays in place
/// without the `log` bridge.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    let result = match config.format {
        LogFormat::Text => {
            let subscriber = Registry::default().with(filter).with(fmt::layer());
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = Registry::default().with(filter).with(fmt::layer().json());
            tracing::subscriber::set_global_default(subscriber)
        }
    };
    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing_log::LogTracer::init().map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    let directive = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config.level.clone());

    EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidFilter {
        directive,
        reason: e.to_string(),
    })
}
