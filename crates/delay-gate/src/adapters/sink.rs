//! # Recording Sink
//!
//! In-memory execution target for testing and dry runs.
//! A production sink would submit the call to the target account.

use crate::domain::entities::ProposedCall;
use crate::domain::value_objects::Address;
use crate::errors::SinkError;
use crate::ports::outbound::ExecutionSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

/// Records every forwarded call. Can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<(Address, ProposedCall)>>,
    failure: Mutex<Option<SinkError>>,
}

impl RecordingSink {
    /// Creates a sink that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following call with `error` until `succeed()`.
    pub fn fail_with(&self, error: SinkError) {
        *self.failure.lock() = Some(error);
    }

    /// Accept calls again.
    pub fn succeed(&self) {
        *self.failure.lock() = None;
    }

    /// Calls accepted so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(Address, ProposedCall)> {
        self.calls.lock().clone()
    }

    /// Number of calls accepted so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ExecutionSink for RecordingSink {
    async fn call(&self, target: Address, call: &ProposedCall) -> Result<(), SinkError> {
        if let Some(err) = self.failure.lock().clone() {
            debug!(%target, error = %err, "Recording sink rejecting call");
            return Err(err);
        }
        self.calls.lock().push((target, call.clone()));
        Ok(())
    }
}
