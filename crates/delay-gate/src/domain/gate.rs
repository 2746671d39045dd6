//! # Delay Gate Aggregate
//!
//! Owner, target, module registry and queue behind one synchronous state
//! machine. Every operation is total over `(state, inputs, now)`; on error the
//! state is unchanged.
//!
//! ## Two-Phase Execution
//!
//! The target call happens outside this type. `begin_execution()` validates
//! the head slot and reserves it; `complete_execution()` consumes the ticket
//! and advances the read cursor only if the sink succeeded. While a ticket is
//! outstanding, nothing else may move the read cursor, so a re-entrant caller
//! can never release the same slot twice.
//!
//! State changes are recorded as [`GateEvent`]s and drained by the caller
//! with `drain_events()`.

use crate::domain::access::Ownable;
use crate::domain::entities::{
    DelayPolicy, ExecutionTicket, GateSnapshot, ModulePage, ProposedCall, SlotState,
};
use crate::domain::queue::TimelockQueue;
use crate::domain::registry::ModuleRegistry;
use crate::domain::services::hash_call;
use crate::domain::value_objects::{Address, Hash, Timestamp};
use crate::errors::{GateError, SinkError};
use crate::events::GateEvent;

/// The complete gate state.
#[derive(Debug)]
pub struct DelayGate {
    access: Ownable,
    target: Address,
    modules: ModuleRegistry,
    queue: TimelockQueue,
    /// Slot reserved by an outstanding `ExecutionTicket`.
    in_flight: Option<u64>,
    /// Events not yet drained.
    outbox: Vec<GateEvent>,
}

impl DelayGate {
    /// Initializes a gate.
    ///
    /// # Errors
    ///
    /// - `InvalidOwner` for a zero owner
    /// - `ZeroTarget` for a zero target
    /// - `InvalidExpiration` for a non-zero expiration under the minimum
    pub fn initialize(
        owner: Address,
        target: Address,
        cooldown_secs: u64,
        expiration_secs: u64,
    ) -> Result<Self, GateError> {
        let access = Ownable::new(owner)?;
        if target.is_zero() {
            return Err(GateError::ZeroTarget);
        }
        let policy = DelayPolicy::new(cooldown_secs, expiration_secs)?;

        Ok(Self {
            access,
            target,
            modules: ModuleRegistry::new(),
            queue: TimelockQueue::new(policy),
            in_flight: None,
            outbox: vec![GateEvent::GateInitialized {
                owner,
                target,
                cooldown_secs,
                expiration_secs,
            }],
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    /// Execution target.
    #[must_use]
    pub fn target(&self) -> Address {
        self.target
    }

    /// Cooldown and expiration.
    #[must_use]
    pub fn policy(&self) -> DelayPolicy {
        self.queue.policy()
    }

    /// Cooldown in seconds.
    #[must_use]
    pub fn cooldown(&self) -> u64 {
        self.queue.policy().cooldown_secs
    }

    /// Expiration window in seconds, 0 if slots never expire.
    #[must_use]
    pub fn expiration(&self) -> u64 {
        self.queue.policy().expiration_secs
    }

    /// Next slot to be written.
    #[must_use]
    pub fn write_cursor(&self) -> u64 {
        self.queue.write_cursor()
    }

    /// Oldest slot not yet processed.
    #[must_use]
    pub fn read_cursor(&self) -> u64 {
        self.queue.read_cursor()
    }

    /// Hash at `index`, zero beyond the write cursor.
    #[must_use]
    pub fn hash_at(&self, index: u64) -> Hash {
        self.queue.hash_at(index)
    }

    /// Creation time at `index`, zero beyond the write cursor.
    #[must_use]
    pub fn created_at(&self, index: u64) -> Timestamp {
        self.queue.created_at(index)
    }

    /// State of the slot at `index`.
    #[must_use]
    pub fn slot_state(&self, index: u64, now: Timestamp) -> Option<SlotState> {
        self.queue.slot_state(index, now)
    }

    /// Slot reserved by an outstanding execution, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// O(1) module membership.
    #[must_use]
    pub fn is_module_enabled(&self, module: &Address) -> bool {
        self.modules.is_enabled(module)
    }

    /// One page of modules after `start`.
    ///
    /// # Errors
    ///
    /// `InvalidModule` if `start` is neither the sentinel nor enabled.
    pub fn list_modules(&self, start: Address, page_size: usize) -> Result<ModulePage, GateError> {
        self.modules.list_paginated(start, page_size)
    }

    /// Every persisted field.
    #[must_use]
    pub fn snapshot(&self) -> GateSnapshot {
        GateSnapshot {
            owner: self.owner(),
            target: self.target,
            policy: self.policy(),
            write_cursor: self.write_cursor(),
            read_cursor: self.read_cursor(),
            modules: self.modules.iter().collect(),
            slots: self.queue.slots().to_vec(),
        }
    }

    /// Takes all events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GateEvent> {
        std::mem::take(&mut self.outbox)
    }

    // =========================================================================
    // OWNER OPERATIONS
    // =========================================================================

    /// Authorizes `module` to propose.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `InvalidModule`, `AlreadyEnabled`.
    pub fn enable_module(&mut self, caller: Address, module: Address) -> Result<(), GateError> {
        self.access.ensure_owner(caller)?;
        self.modules.enable(module)?;
        self.outbox.push(GateEvent::ModuleEnabled { module });
        Ok(())
    }

    /// Revokes `module`, which must directly follow `prev` in list order.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `InvalidModule`, `NotEnabled`.
    pub fn disable_module(
        &mut self,
        caller: Address,
        prev: Address,
        module: Address,
    ) -> Result<(), GateError> {
        self.access.ensure_owner(caller)?;
        self.modules.disable(prev, module)?;
        self.outbox.push(GateEvent::ModuleDisabled { module });
        Ok(())
    }

    /// Sets the cooldown.
    ///
    /// # Errors
    ///
    /// `Unauthorized`.
    pub fn set_cooldown(&mut self, caller: Address, seconds: u64) -> Result<(), GateError> {
        self.access.ensure_owner(caller)?;
        self.queue.set_cooldown(seconds);
        self.outbox.push(GateEvent::CooldownSet { seconds });
        Ok(())
    }

    /// Sets the expiration window.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `InvalidExpiration`.
    pub fn set_expiration(&mut self, caller: Address, seconds: u64) -> Result<(), GateError> {
        self.access.ensure_owner(caller)?;
        self.queue.set_expiration(seconds)?;
        self.outbox.push(GateEvent::ExpirationSet { seconds });
        Ok(())
    }

    /// Fast-forwards the read cursor past queued slots.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `ExecutionInProgress`, `NonceTooLow`, `NonceTooHigh`.
    pub fn set_read_cursor(&mut self, caller: Address, new_cursor: u64) -> Result<(), GateError> {
        self.access.ensure_owner(caller)?;
        self.ensure_idle()?;
        let previous = self.queue.read_cursor();
        self.queue.set_read_cursor(new_cursor)?;
        self.outbox.push(GateEvent::ReadCursorSet {
            previous,
            current: new_cursor,
        });
        Ok(())
    }

    /// Hands ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, `InvalidOwner`.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<(), GateError> {
        let previous = self.access.transfer(caller, new_owner)?;
        self.outbox.push(GateEvent::OwnershipTransferred {
            previous,
            current: new_owner,
        });
        Ok(())
    }

    // =========================================================================
    // QUEUE OPERATIONS
    // =========================================================================

    /// Queues `call` on behalf of an enabled module. Returns the slot index.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is an enabled module.
    pub fn propose(
        &mut self,
        caller: Address,
        call: ProposedCall,
        now: Timestamp,
    ) -> Result<u64, GateError> {
        if !self.modules.is_enabled(&caller) {
            return Err(GateError::Unauthorized { caller });
        }

        let hash = hash_call(&call);
        let index = self.queue.push(hash, now);
        self.outbox.push(GateEvent::TransactionAdded {
            index,
            hash,
            module: caller,
            call,
        });
        Ok(index)
    }

    /// Validates the head slot against `call` and reserves it.
    ///
    /// # Errors
    ///
    /// `ExecutionInProgress`, `QueueEmpty`, `InCooldown`, `Expired`,
    /// `HashMismatch`.
    pub fn begin_execution(
        &mut self,
        call: &ProposedCall,
        now: Timestamp,
    ) -> Result<ExecutionTicket, GateError> {
        self.ensure_idle()?;
        let hash = hash_call(call);
        let index = self.queue.check_head(hash, now)?;
        self.in_flight = Some(index);
        Ok(ExecutionTicket { index, hash })
    }

    /// Settles a reserved execution with the sink outcome.
    ///
    /// On success the read cursor moves past the slot and the slot index is
    /// returned. On failure the reservation is released and the slot stays at
    /// the head.
    ///
    /// # Errors
    ///
    /// - `TargetCallFailed` carrying the sink error verbatim
    /// - `Internal` if the ticket does not match the reserved slot or its hash
    pub fn complete_execution(
        &mut self,
        ticket: ExecutionTicket,
        outcome: Result<(), SinkError>,
    ) -> Result<u64, GateError> {
        if self.in_flight != Some(ticket.index)
            || self.queue.read_cursor() != ticket.index
            || self.queue.hash_at(ticket.index) != ticket.hash
        {
            return Err(GateError::Internal(format!(
                "ticket for slot {} does not match reservation {:?}",
                ticket.index, self.in_flight
            )));
        }
        self.in_flight = None;

        outcome?;
        self.queue.advance()?;
        self.outbox.push(GateEvent::TransactionExecuted {
            index: ticket.index,
            hash: ticket.hash,
        });
        Ok(ticket.index)
    }

    /// Runs the whole execution with a synchronous sink.
    ///
    /// # Errors
    ///
    /// Everything `begin_execution()` and `complete_execution()` return.
    pub fn execute_next<F>(
        &mut self,
        call: &ProposedCall,
        now: Timestamp,
        sink: F,
    ) -> Result<u64, GateError>
    where
        F: FnOnce(Address, &ProposedCall) -> Result<(), SinkError>,
    {
        let ticket = self.begin_execution(call, now)?;
        let outcome = sink(self.target, call);
        self.complete_execution(ticket, outcome)
    }

    /// Skips expired slots at the head. Returns how many were skipped.
    ///
    /// Open to anyone and never fails. A no-op on an empty or live head, and
    /// while a ticket is outstanding, since the reserved head must not move.
    ///
    /// # Errors
    ///
    /// None; the `Result` keeps the shape of the other queue operations.
    pub fn skip_expired(&mut self, now: Timestamp) -> Result<u64, GateError> {
        if self.in_flight.is_some() {
            return Ok(0);
        }
        let from = self.queue.skip_expired(now);
        let to = self.queue.read_cursor();
        if to > from {
            self.outbox.push(GateEvent::TransactionsSkipped { from, to });
        }
        Ok(to - from)
    }

    fn ensure_idle(&self) -> Result<(), GateError> {
        match self.in_flight {
            Some(index) => Err(GateError::ExecutionInProgress { index }),
            None => Ok(()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
