//! Logging setup for hosts embedding the orchestrator.
//!
//! Library code logs through the `log` facade; this installs a tracing
//! subscriber and forwards `log` records into it.

use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::error::TelemetryError;

/// Installs the global subscriber. `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) -> Result<(), TelemetryError> {
    tracing_log::LogTracer::init().map_err(|e| TelemetryError::LogBridge(e.to_string()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))
}
