//! # Error Types
//!
//! All failures are local, synchronous and leave gate state untouched.
//! The gate never retries on its own; retry policy belongs to the caller.

use crate::domain::value_objects::{Address, Hash, Timestamp};
use thiserror::Error;

// =============================================================================
// GATE ERRORS
// =============================================================================

/// Errors returned by gate operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Caller is not the owner, or not an enabled module when proposing.
    #[error("unauthorized caller: {caller}")]
    Unauthorized { caller: Address },

    /// Module is the zero address or the registry sentinel.
    #[error("invalid module: {0}")]
    InvalidModule(Address),

    /// Module is already in the registry.
    #[error("module already enabled: {0}")]
    AlreadyEnabled(Address),

    /// `prev` does not point at `module` in the registry.
    #[error("module not enabled: {module} (prev {prev})")]
    NotEnabled { prev: Address, module: Address },

    /// Expiration must be zero or at least the minimum window.
    #[error("invalid expiration: {seconds}s (must be 0 or >= {minimum}s)")]
    InvalidExpiration { seconds: u64, minimum: u64 },

    /// Target cannot be the zero address.
    #[error("target is the zero address")]
    ZeroTarget,

    /// Owner cannot be the zero address.
    #[error("owner is the zero address")]
    InvalidOwner,

    /// Requested read cursor does not move forward.
    #[error("nonce too low: {requested} <= read cursor {current}")]
    NonceTooLow { requested: u64, current: u64 },

    /// Requested read cursor is past the write cursor.
    #[error("nonce too high: {requested} > write cursor {write_cursor}")]
    NonceTooHigh { requested: u64, write_cursor: u64 },

    /// Nothing is queued.
    #[error("queue is empty")]
    QueueEmpty,

    /// Head slot has not aged past the cooldown.
    #[error("slot {index} in cooldown until {ready_at} (now {now})")]
    InCooldown {
        index: u64,
        ready_at: Timestamp,
        now: Timestamp,
    },

    /// Head slot aged past cooldown plus expiration.
    #[error("slot {index} expired at {expired_at} (now {now})")]
    Expired {
        index: u64,
        expired_at: Timestamp,
        now: Timestamp,
    },

    /// Supplied call parameters do not hash to the queued head.
    #[error("hash mismatch at slot {index}: queued {expected}, supplied {actual}")]
    HashMismatch {
        index: u64,
        expected: Hash,
        actual: Hash,
    },

    /// The execution sink reported failure.
    #[error("target call failed: {0}")]
    TargetCallFailed(#[from] SinkError),

    /// Another execution is waiting on the sink.
    #[error("execution in progress for slot {index}")]
    ExecutionInProgress { index: u64 },

    /// Internal error (should not happen in production).
    #[error("internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Returns true for authorization failures.
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns true for queue-policy rejections of `execute_next`.
    #[must_use]
    pub fn is_queue_policy(&self) -> bool {
        matches!(
            self,
            Self::QueueEmpty | Self::InCooldown { .. } | Self::Expired { .. } | Self::HashMismatch { .. }
        )
    }

    /// Returns true if the same call could succeed later without any
    /// configuration change (time passing or the sink recovering).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::InCooldown { .. } | Self::TargetCallFailed(_) | Self::ExecutionInProgress { .. }
        )
    }
}

// =============================================================================
// SINK ERRORS
// =============================================================================

/// Failure reported by the execution target.
///
/// The gate treats the reason as opaque and surfaces it verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The target executed the call and it reverted.
    #[error("reverted: {0}")]
    Reverted(String),

    /// The target could not be reached.
    #[error("target unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// TESTS
// =============================================================================
