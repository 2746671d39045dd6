//! # Domain Invariants
//!
//! Structural checks over a [`GateSnapshot`]. The state machine maintains
//! these by construction; the checks exist for tests, audits and restored
//! snapshots.
//!
//! - INVARIANT-1: Cursor Ordering (`read_cursor <= write_cursor`)
//! - INVARIANT-2: Slot Log Length (`slots.len() == write_cursor`)
//! - INVARIANT-3: Registry Hygiene (no zero, sentinel or duplicate modules)
//! - INVARIANT-4: Valid Configuration (non-zero owner/target, expiration window)

use crate::domain::entities::{validate_expiration, GateSnapshot};
use std::collections::HashSet;

/// INVARIANT-1: Cursor Ordering
#[must_use]
pub fn check_cursor_invariant(snapshot: &GateSnapshot) -> bool {
    snapshot.read_cursor <= snapshot.write_cursor
}

/// INVARIANT-2: Slot Log Length
///
/// The log is append-only and never compacted, so its length is the write
/// cursor.
#[must_use]
pub fn check_slot_log_invariant(snapshot: &GateSnapshot) -> bool {
    snapshot.slots.len() as u64 == snapshot.write_cursor
}

/// INVARIANT-3: Registry Hygiene
#[must_use]
pub fn check_registry_invariant(snapshot: &GateSnapshot) -> bool {
    let mut seen = HashSet::with_capacity(snapshot.modules.len());
    snapshot
        .modules
        .iter()
        .all(|m| !m.is_zero() && !m.is_sentinel() && seen.insert(*m))
}

/// INVARIANT-4: Valid Configuration
#[must_use]
pub fn check_config_invariant(snapshot: &GateSnapshot) -> bool {
    !snapshot.owner.is_zero()
        && !snapshot.target.is_zero()
        && validate_expiration(snapshot.policy.expiration_secs).is_ok()
}

/// Result of checking all invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantCheckResult {
    /// Violations found.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// True if no invariant is violated.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A violated invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// INVARIANT-1.
    ReadCursorAhead { read_cursor: u64, write_cursor: u64 },
    /// INVARIANT-2.
    SlotLogMismatch { slots: usize, write_cursor: u64 },
    /// INVARIANT-3.
    CorruptRegistry,
    /// INVARIANT-4.
    InvalidConfig,
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(snapshot: &GateSnapshot) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_cursor_invariant(snapshot) {
        violations.push(InvariantViolation::ReadCursorAhead {
            read_cursor: snapshot.read_cursor,
            write_cursor: snapshot.write_cursor,
        });
    }
    if !check_slot_log_invariant(snapshot) {
        violations.push(InvariantViolation::SlotLogMismatch {
            slots: snapshot.slots.len(),
            write_cursor: snapshot.write_cursor,
        });
    }
    if !check_registry_invariant(snapshot) {
        violations.push(InvariantViolation::CorruptRegistry);
    }
    if !check_config_invariant(snapshot) {
        violations.push(InvariantViolation::InvalidConfig);
    }

    InvariantCheckResult { violations }
}
