//! # Driving Ports (API - Inbound)
//!
//! The public API of the gate. Callers identify themselves explicitly; the
//! surrounding transport is responsible for authenticating `caller`.
//!
//! | Operation | Caller |
//! |-----------|--------|
//! | `propose` | enabled module |
//! | `execute_next`, `skip_expired` | anyone |
//! | module, policy, cursor and ownership setters | owner |
//! | queries | anyone |

use crate::domain::entities::{GateSnapshot, ModulePage, ProposedCall, SlotState};
use crate::domain::value_objects::{Address, Hash, Timestamp};
use crate::errors::GateError;
use async_trait::async_trait;

/// Primary API of the delay gate.
///
/// ## Usage
///
/// ```ignore
/// let index = api.propose(module, call.clone()).await?;
/// // ... cooldown elapses ...
/// api.execute_next(call).await?;
/// ```
#[async_trait]
pub trait DelayGateApi: Send + Sync {
    // =========================================================================
    // QUEUE
    // =========================================================================

    /// Queue `call`. Returns the assigned slot index.
    async fn propose(&self, caller: Address, call: ProposedCall) -> Result<u64, GateError>;

    /// Release the head slot to the target. `call` must hash to the queued
    /// slot. Returns the executed slot index.
    async fn execute_next(&self, call: ProposedCall) -> Result<u64, GateError>;

    /// Drop expired slots at the head. Returns how many were skipped.
    ///
    /// Never fails. Skips nothing while an execution is in flight.
    async fn skip_expired(&self) -> Result<u64, GateError>;

    // =========================================================================
    // OWNER
    // =========================================================================

    /// Authorize a module.
    async fn enable_module(&self, caller: Address, module: Address) -> Result<(), GateError>;

    /// Revoke a module. `prev` is its predecessor in list order, or the
    /// sentinel for the first module.
    async fn disable_module(
        &self,
        caller: Address,
        prev: Address,
        module: Address,
    ) -> Result<(), GateError>;

    /// Set the cooldown in seconds.
    async fn set_cooldown(&self, caller: Address, seconds: u64) -> Result<(), GateError>;

    /// Set the expiration window in seconds (0 = never).
    async fn set_expiration(&self, caller: Address, seconds: u64) -> Result<(), GateError>;

    /// Fast-forward the read cursor.
    async fn set_read_cursor(&self, caller: Address, new_cursor: u64) -> Result<(), GateError>;

    /// Hand ownership over.
    async fn transfer_ownership(&self, caller: Address, new_owner: Address)
        -> Result<(), GateError>;

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// O(1) module membership.
    async fn is_module_enabled(&self, module: Address) -> bool;

    /// One page of modules after `start`.
    async fn list_modules(&self, start: Address, page_size: usize)
        -> Result<ModulePage, GateError>;

    /// Hash at `index`, zero beyond the write cursor.
    async fn hash_at(&self, index: u64) -> Hash;

    /// Creation time at `index`, zero beyond the write cursor.
    async fn created_at(&self, index: u64) -> Timestamp;

    /// Oldest unprocessed slot.
    async fn read_cursor(&self) -> u64;

    /// Next slot to be written.
    async fn write_cursor(&self) -> u64;

    /// State of the slot at `index` right now.
    async fn slot_state(&self, index: u64) -> Option<SlotState>;

    /// Every persisted field.
    async fn snapshot(&self) -> GateSnapshot;
}
