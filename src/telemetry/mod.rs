//! Tracing initialization.
//!
//! Installs a tracing-subscriber fmt layer on stderr. Stdout is reserved
//! for the messages the commands print.

pub mod transition;

use crate::error::{Error, Result};

/// Configuration for telemetry initialization.
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is not set (e.g. "warn", "vpn_client=debug").
    pub default_level: String,
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter directive is malformed or a subscriber
/// was already installed.
pub fn init_telemetry(config: TelemetryConfig) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.default_level).map_err(|e| {
            Error::Config(format!("invalid log level '{}': {e}", config.default_level))
        })?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to init tracing subscriber: {e}")))?;

    Ok(())
}
