//! # Timelock Queue
//!
//! Append-only log of `(hash, created_at)` slots with two cursors.
//!
//! ## Invariants Enforced
//!
//! - `read_cursor <= write_cursor` (`advance()` and `set_read_cursor()`)
//! - Slots are never modified or removed after `push()`
//! - Only the slot at `read_cursor` can be executed or skipped (strict FIFO)
//! - Slot state is derived from time and cursors, never stored

use crate::domain::entities::{DelayPolicy, QueuedSlot, SlotState};
use crate::domain::value_objects::{Hash, Timestamp};
use crate::errors::GateError;

/// The queue and its policy.
#[derive(Clone, Debug, Default)]
pub struct TimelockQueue {
    /// Every slot ever written, indexed from 0.
    slots: Vec<QueuedSlot>,
    /// Oldest slot not yet executed or skipped.
    read_cursor: u64,
    /// Cooldown and expiration.
    policy: DelayPolicy,
}

impl TimelockQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new(policy: DelayPolicy) -> Self {
        Self {
            slots: Vec::new(),
            read_cursor: 0,
            policy,
        }
    }

    /// Next slot index to be written.
    #[must_use]
    pub fn write_cursor(&self) -> u64 {
        self.slots.len() as u64
    }

    /// Oldest slot not yet processed.
    #[must_use]
    pub fn read_cursor(&self) -> u64 {
        self.read_cursor
    }

    /// Number of slots still ahead of the read cursor.
    #[must_use]
    pub fn depth(&self) -> u64 {
        self.write_cursor() - self.read_cursor
    }

    /// True if every slot has been processed.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.read_cursor == self.write_cursor()
    }

    /// Current policy.
    #[must_use]
    pub fn policy(&self) -> DelayPolicy {
        self.policy
    }

    /// All slots ever written.
    #[must_use]
    pub fn slots(&self) -> &[QueuedSlot] {
        &self.slots
    }

    /// Slot at `index`, if written.
    #[must_use]
    pub fn slot(&self, index: u64) -> Option<&QueuedSlot> {
        usize::try_from(index).ok().and_then(|i| self.slots.get(i))
    }

    /// Hash at `index`, zero if never written.
    #[must_use]
    pub fn hash_at(&self, index: u64) -> Hash {
        self.slot(index).map(|s| s.hash).unwrap_or_default()
    }

    /// Creation time at `index`, zero if never written.
    #[must_use]
    pub fn created_at(&self, index: u64) -> Timestamp {
        self.slot(index).map(|s| s.created_at).unwrap_or_default()
    }

    /// State of the slot at `index` at time `now`.
    #[must_use]
    pub fn slot_state(&self, index: u64, now: Timestamp) -> Option<SlotState> {
        let slot = self.slot(index)?;
        if index < self.read_cursor {
            return Some(SlotState::Processed);
        }
        Some(self.policy.classify(slot.created_at, now))
    }

    /// Appends a slot and returns its index.
    pub fn push(&mut self, hash: Hash, now: Timestamp) -> u64 {
        let index = self.write_cursor();
        self.slots.push(QueuedSlot {
            hash,
            created_at: now,
        });
        index
    }

    /// Validates the head slot against policy and the supplied hash.
    ///
    /// Returns the head index without mutating anything.
    ///
    /// # Errors
    ///
    /// `QueueEmpty`, `InCooldown`, `Expired` or `HashMismatch`, checked in
    /// that order.
    pub fn check_head(&self, candidate: Hash, now: Timestamp) -> Result<u64, GateError> {
        let index = self.read_cursor;
        let slot = self.slot(index).ok_or(GateError::QueueEmpty)?;

        if self.policy.is_in_cooldown(slot.created_at, now) {
            return Err(GateError::InCooldown {
                index,
                ready_at: self.policy.ready_at(slot.created_at),
                now,
            });
        }
        if let Some(expired_at) = self.policy.expires_at(slot.created_at) {
            if now >= expired_at {
                return Err(GateError::Expired {
                    index,
                    expired_at,
                    now,
                });
            }
        }
        if candidate != slot.hash {
            return Err(GateError::HashMismatch {
                index,
                expected: slot.hash,
                actual: candidate,
            });
        }
        Ok(index)
    }

    /// Moves the read cursor past the head slot.
    ///
    /// # Errors
    ///
    /// `QueueEmpty` if there is no head slot.
    pub fn advance(&mut self) -> Result<u64, GateError> {
        if self.is_drained() {
            return Err(GateError::QueueEmpty);
        }
        self.read_cursor += 1;
        Ok(self.read_cursor)
    }

    /// Skips consecutive expired slots from the head.
    ///
    /// Returns the read cursor before skipping. Stops at the first slot that
    /// is not expired, so pending and executable slots are never touched.
    pub fn skip_expired(&mut self, now: Timestamp) -> u64 {
        let from = self.read_cursor;
        while let Some(slot) = self.slot(self.read_cursor) {
            if !self.policy.is_expired(slot.created_at, now) {
                break;
            }
            self.read_cursor += 1;
        }
        from
    }

    /// Fast-forwards the read cursor.
    ///
    /// # Errors
    ///
    /// - `NonceTooLow` unless `new_cursor > read_cursor`
    /// - `NonceTooHigh` unless `new_cursor <= write_cursor`
    pub fn set_read_cursor(&mut self, new_cursor: u64) -> Result<(), GateError> {
        if new_cursor <= self.read_cursor {
            return Err(GateError::NonceTooLow {
                requested: new_cursor,
                current: self.read_cursor,
            });
        }
        if new_cursor > self.write_cursor() {
            return Err(GateError::NonceTooHigh {
                requested: new_cursor,
                write_cursor: self.write_cursor(),
            });
        }
        self.read_cursor = new_cursor;
        Ok(())
    }

    /// Sets the cooldown. Takes effect for every unprocessed slot.
    pub fn set_cooldown(&mut self, seconds: u64) {
        self.policy.cooldown_secs = seconds;
    }

    /// Sets the expiration window.
    ///
    /// # Errors
    ///
    /// `InvalidExpiration` unless zero or at least the minimum window.
    pub fn set_expiration(&mut self, seconds: u64) -> Result<(), GateError> {
        self.policy = DelayPolicy::new(self.policy.cooldown_secs, seconds)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
