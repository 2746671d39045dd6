//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or full directive
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to emit JSON instead of the pretty format
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "delay-gate".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DG_SERVICE_NAME`: Service name (default: delay-gate)
    /// - `DG_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `DG_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `DG_JSON_LOGS`: Enable JSON logs (default: false)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: env::var("DG_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: env::var("DG_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: env_flag("DG_CONSOLE_OUTPUT").unwrap_or(defaults.console_output),

            json_logs: env_flag("DG_JSON_LOGS").unwrap_or(defaults.json_logs),
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
