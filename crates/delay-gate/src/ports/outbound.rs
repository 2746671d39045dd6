//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the gate depends on:
//! - The execution target that performs released calls
//! - A clock
//! - An event publisher
//!
//! Dependencies point INWARD: adapters implement these traits.

use crate::domain::entities::ProposedCall;
use crate::domain::value_objects::{Address, Timestamp};
use crate::errors::SinkError;
use crate::events::EventEnvelope;
use async_trait::async_trait;

// =============================================================================
// EXECUTION SINK
// =============================================================================

/// The capability that performs a released call on the target.
///
/// ## Trust Boundary
///
/// Control leaves the gate for the duration of `call`. Implementations may
/// call back into the gate; the service rejects re-entrant executions with
/// `ExecutionInProgress` until this call returns.
///
/// The gate never retries. A returned error is surfaced to the executor as
/// `TargetCallFailed` and the slot stays at the head of the queue.
#[async_trait]
pub trait ExecutionSink: Send + Sync {
    /// Perform `call` as `target`.
    ///
    /// # Arguments
    ///
    /// * `target` - Account the gate forwards to
    /// * `call` - Exactly the parameters that were queued
    async fn call(&self, target: Address, call: &ProposedCall) -> Result<(), SinkError>;
}

// =============================================================================
// CLOCK
// =============================================================================

/// Source of the current time, read once per operation.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Outlet for gate events.
pub trait EventPublisher: Send + Sync {
    /// Publish one event.
    ///
    /// Returns the number of subscribers that received it. Publishing never
    /// fails the operation that produced the event.
    fn publish(&self, envelope: EventEnvelope) -> usize;

    /// Total events published so far.
    fn events_published(&self) -> u64;
}

// =============================================================================
// TESTS
// =============================================================================
