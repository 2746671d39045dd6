//! # Gate Telemetry
//!
//! Logging and metrics for the delay gate.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an env filter, pretty or JSON output
//! - **Metrics**: Prometheus counters and gauges in a private registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gate_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(&TelemetryConfig::from_env()).expect("telemetry");
//!     // ...
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `DG_JSON_LOGS` | `false` | JSON formatted output |
//! | `DG_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `DG_SERVICE_NAME` | `delay-gate` | Service name on every log line |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, EXECUTIONS_TOTAL, PROPOSALS_TOTAL,
    QUEUE_DEPTH, SKIPPED_TOTAL,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Bad filter directive or similar.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the log subscriber.
///
/// Hold the returned guard for the lifetime of the process.
///
/// # Errors
///
/// Fails if a global subscriber is already installed or the filter is invalid.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first, they never touch global subscriber state
    let metrics = register_metrics()?;
    let logging = init_logging(config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Keeps telemetry alive.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}

/// Increment a counter, optionally with label values.
///
/// ```rust,ignore
/// metric_inc!(PROPOSALS_TOTAL);
/// metric_inc!(EXECUTIONS_TOTAL, &["success"]);
/// ```
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
