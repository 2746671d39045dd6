//! Prometheus metrics for the delay gate.
//!
//! All metrics follow the naming convention: `dg_<metric>[_<unit>]`
//!
//! ## Metric Types
//!
//! - **Counter**: proposals, executions by outcome, skipped slots
//! - **Gauge**: unprocessed slots (`write_cursor - read_cursor`)

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Calls queued by modules
    pub static ref PROPOSALS_TOTAL: IntCounter = IntCounter::new(
        "dg_proposals_total",
        "Total number of calls queued"
    ).expect("metric creation failed");

    /// Execution attempts by outcome (success, failed, rejected)
    pub static ref EXECUTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("dg_executions_total", "Execution attempts by outcome"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Expired slots skipped
    pub static ref SKIPPED_TOTAL: IntCounter = IntCounter::new(
        "dg_skipped_total",
        "Total number of expired slots skipped"
    ).expect("metric creation failed");

    /// Unprocessed slots
    pub static ref QUEUE_DEPTH: IntGauge = IntGauge::new(
        "dg_queue_depth",
        "Slots between the read and write cursors"
    ).expect("metric creation failed");
}

/// Handle for the registered metrics.
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// The registry the gate metrics live in.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Register all metrics with the global registry.
///
/// Calling this more than once is harmless.
///
/// # Errors
///
/// Any registration failure other than a duplicate.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(PROPOSALS_TOTAL.clone()),
        Box::new(EXECUTIONS_TOTAL.clone()),
        Box::new(SKIPPED_TOTAL.clone()),
        Box::new(QUEUE_DEPTH.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
///
/// # Errors
///
/// Encoding failures.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
