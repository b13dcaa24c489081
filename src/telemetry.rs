//! Logging setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration taken from the command line.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default filter when `RUST_LOG` is unset (e.g. "info", "blackhole=debug").
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logs: false }
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Errors
///
/// Returns an error if `config.log_level` is not a valid filter directive.
pub fn init_tracing(config: &TracingConfig) -> Result<(), String> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| format!("Invalid log level '{}': {e}", config.log_level))?,
    };

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let result = if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        subscriber.with(fmt::layer().with_target(false).with_writer(std::io::stderr)).try_init()
    };
    // Already initialised (e.g. by a test harness).
    let _ = result;
    Ok(())
}
