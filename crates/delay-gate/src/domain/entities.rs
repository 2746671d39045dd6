//! # Core Domain Entities
//!
//! Calls, queue slots, and the cooldown/expiration policy that decides what a
//! slot means at a given instant.

use crate::domain::value_objects::{Address, Bytes, CallKind, Hash, Timestamp, U256};
use crate::errors::GateError;
use serde::{Deserialize, Serialize};

/// Smallest non-zero expiration window, in seconds.
pub const MIN_EXPIRATION_SECS: u64 = 60;

// =============================================================================
// PROPOSED CALL
// =============================================================================

/// The parameters of a call forwarded to the target.
///
/// Only its hash is stored; the full parameters travel in the
/// `TransactionAdded` event and must be presented again to execute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedCall {
    /// Call recipient.
    pub to: Address,
    /// Value transferred with the call.
    pub value: U256,
    /// Opaque payload.
    pub data: Bytes,
    /// Call or delegate call.
    pub operation: CallKind,
}

impl ProposedCall {
    /// Creates a new call.
    #[must_use]
    pub fn new(to: Address, value: U256, data: Bytes, operation: CallKind) -> Self {
        Self {
            to,
            value,
            data,
            operation,
        }
    }

    /// Creates a plain value-free call with the given payload.
    #[must_use]
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self::new(to, U256::zero(), data.into(), CallKind::Call)
    }
}

// =============================================================================
// QUEUED SLOT
// =============================================================================

/// An immutable queue record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueuedSlot {
    /// Hash of the proposed call.
    pub hash: Hash,
    /// Proposal time.
    pub created_at: Timestamp,
}

/// Interpretation of a slot at a given instant.
///
/// Never stored: always recomputed from the slot age and the read cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    /// Younger than the cooldown.
    Pending,
    /// Within the execution window.
    Executable,
    /// Past cooldown plus expiration. Can only be skipped.
    Expired,
    /// Behind the read cursor (executed, skipped or fast-forwarded).
    Processed,
}

// =============================================================================
// DELAY POLICY
// =============================================================================

/// Cooldown and expiration settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DelayPolicy {
    /// Minimum slot age before execution.
    pub cooldown_secs: u64,
    /// Execution window after the cooldown. Zero means slots never expire.
    pub expiration_secs: u64,
}

impl DelayPolicy {
    /// Creates a validated policy.
    ///
    /// # Errors
    ///
    /// `InvalidExpiration` if the expiration is non-zero and shorter than
    /// [`MIN_EXPIRATION_SECS`].
    pub fn new(cooldown_secs: u64, expiration_secs: u64) -> Result<Self, GateError> {
        validate_expiration(expiration_secs)?;
        Ok(Self {
            cooldown_secs,
            expiration_secs,
        })
    }

    /// Earliest time a slot created at `created_at` may execute.
    #[must_use]
    pub fn ready_at(&self, created_at: Timestamp) -> Timestamp {
        created_at.saturating_add(self.cooldown_secs)
    }

    /// Time at which a slot becomes void, if it ever does.
    #[must_use]
    pub fn expires_at(&self, created_at: Timestamp) -> Option<Timestamp> {
        (self.expiration_secs != 0)
            .then(|| self.ready_at(created_at).saturating_add(self.expiration_secs))
    }

    /// True while the slot is younger than the cooldown.
    #[must_use]
    pub fn is_in_cooldown(&self, created_at: Timestamp, now: Timestamp) -> bool {
        now < self.ready_at(created_at)
    }

    /// True once the slot aged past cooldown plus expiration.
    #[must_use]
    pub fn is_expired(&self, created_at: Timestamp, now: Timestamp) -> bool {
        self.expires_at(created_at)
            .is_some_and(|expires_at| now >= expires_at)
    }

    /// Classifies a slot that is still at or ahead of the read cursor.
    #[must_use]
    pub fn classify(&self, created_at: Timestamp, now: Timestamp) -> SlotState {
        if self.is_in_cooldown(created_at, now) {
            SlotState::Pending
        } else if self.is_expired(created_at, now) {
            SlotState::Expired
        } else {
            SlotState::Executable
        }
    }
}

/// Checks an expiration window.
///
/// # Errors
///
/// `InvalidExpiration` unless `seconds == 0 || seconds >= MIN_EXPIRATION_SECS`.
pub fn validate_expiration(seconds: u64) -> Result<(), GateError> {
    if seconds != 0 && seconds < MIN_EXPIRATION_SECS {
        return Err(GateError::InvalidExpiration {
            seconds,
            minimum: MIN_EXPIRATION_SECS,
        });
    }
    Ok(())
}

// =============================================================================
// MODULE PAGE
// =============================================================================

/// One page of the module list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePage {
    /// Modules in list order.
    pub modules: Vec<Address>,
    /// Cursor to pass to the next call. `Address::SENTINEL` once exhausted.
    pub next: Address,
}

impl ModulePage {
    /// True if there is nothing left after this page.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_sentinel()
    }
}

// =============================================================================
// EXECUTION TICKET
// =============================================================================

/// Proof that the head slot passed validation and is reserved for one
/// execution. Consumed by `DelayGate::complete_execution`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an unfinished execution blocks the queue"]
pub struct ExecutionTicket {
    pub(crate) index: u64,
    pub(crate) hash: Hash,
}

impl ExecutionTicket {
    /// Slot being executed.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Hash of the slot being executed.
    pub fn hash(&self) -> Hash {
        self.hash
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Every persisted field of a gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSnapshot {
    /// Current owner.
    pub owner: Address,
    /// Execution target.
    pub target: Address,
    /// Delay settings.
    pub policy: DelayPolicy,
    /// Next slot to be written.
    pub write_cursor: u64,
    /// Oldest unprocessed slot.
    pub read_cursor: u64,
    /// Enabled modules in list order.
    pub modules: Vec<Address>,
    /// All slots ever written.
    pub slots: Vec<QueuedSlot>,
}

// =============================================================================
// TESTS
// =============================================================================
