//! Structured logging setup
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and either a
//! human readable or a JSON formatter.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Error types for observability operations
#[derive(Error, Debug)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),
}

/// Result type for observability operations
pub type Result<T> = std::result::Result<T, ObservabilityError>;

/// Configuration for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Enable JSON logging format
    pub json_logs: bool,

    /// Service name attached to the startup event
    pub service_name: String,

    /// Service version
    pub service_version: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            service_name: "dday-server".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Check that `log_level` names a real level
    ///
    /// # Errors
    ///
    /// Returns `ObservabilityError::TracingInit` for an unknown level
    pub fn level(&self) -> Result<Level> {
        self.log_level
            .parse::<Level>()
            .map_err(|e| ObservabilityError::TracingInit(format!("Invalid log level: {e}")))
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level when it is set.
///
/// # Errors
///
/// Returns `ObservabilityError::TracingInit` if the level is invalid or a
/// global subscriber is already installed
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    config.level()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        registry.with(json_layer).try_init()
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE);

        registry.with(fmt_layer).try_init()
    };
    installed.map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    info!(
        service = %config.service_name,
        version = %config.service_version,
        "Tracing initialized with level: {}",
        config.log_level
    );
    Ok(())
}
