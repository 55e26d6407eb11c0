//! Tracing setup for processes embedding the kernel

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{KernelError, Result};

/// Install a global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails if a global
/// subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match (config.json, config.timestamps) {
        (true, true) => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        (true, false) => registry
            .with(tracing_subscriber::fmt::layer().json().without_time())
            .try_init(),
        (false, true) => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        (false, false) => registry
            .with(tracing_subscriber::fmt::layer().without_time())
            .try_init(),
    };

    installed.map_err(|e| KernelError::Telemetry(e.to_string()))
}

/// Parse a configured level or `EnvFilter` directive list.
fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| KernelError::Telemetry(format!("invalid log level '{}': {}", level, e)))
}
