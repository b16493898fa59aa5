//! Log subscriber setup
//!
//! Installs the process-wide `tracing` subscriber: an `EnvFilter` (from
//! `RUST_LOG`, else the configured directives) and either a human-readable
//! or a JSON formatting layer.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TelemetryAppConfig;

/// Error returned when a global subscriber is already installed
#[derive(Debug, thiserror::Error)]
#[error("Telemetry initialization failed: {0}")]
pub struct TelemetryError(String);

/// Filter from `RUST_LOG`, falling back to `default_directives`
pub fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Install the global subscriber
///
/// Call once, at process start.
pub fn init_telemetry(config: &TelemetryAppConfig) -> Result<(), TelemetryError> {
    let json = config.json;
    tracing_subscriber::registry()
        .with(env_filter(&config.log_filter))
        .with(json.then(|| fmt::layer().json().with_current_span(true)))
        .with((!json).then(fmt::layer))
        .try_init()
        .map_err(|e| TelemetryError(e.to_string()))
}
