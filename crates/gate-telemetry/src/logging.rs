//! Log subscriber installation.
//!
//! JSON output carries the file, line and thread id for log shippers; the
//! pretty format is meant for terminals.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Marker that the global subscriber is installed.
#[derive(Debug)]
pub struct LoggingGuard {
    service_name: String,
}

impl LoggingGuard {
    /// Name the subscriber was installed for.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

/// Install the global log subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`.
///
/// # Errors
///
/// `Config` for a bad filter, `LoggingInit` if a subscriber already exists.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let env_filter = build_filter(&config.log_level)?;

    let result = match (config.console_output, config.json_logs) {
        (true, true) => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .try_init()
        }
        (true, false) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()
        }
        (false, _) => tracing_subscriber::registry().with(env_filter).try_init(),
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        service_name: config.service_name.clone(),
    })
}

fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| TelemetryError::Config(e.to_string()))
}
