//! # Event Schema
//!
//! Every gate state change produces one [`GateEvent`]. The service wraps each
//! event in an [`EventEnvelope`] before publishing.
//!
//! | Event | Emitted by |
//! |-------|-----------|
//! | `GateInitialized` | `initialize` |
//! | `ModuleEnabled` / `ModuleDisabled` | `enable_module` / `disable_module` |
//! | `TransactionAdded` | `propose` (carries the full call) |
//! | `TransactionExecuted` | `execute_next` on sink success |
//! | `TransactionsSkipped` | `skip_expired` when at least one slot is skipped |
//! | `CooldownSet` / `ExpirationSet` | policy setters |
//! | `ReadCursorSet` | `set_read_cursor` |
//! | `OwnershipTransferred` | `transfer_ownership` |

use crate::domain::entities::ProposedCall;
use crate::domain::value_objects::{Address, Hash, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gate state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GateEvent {
    /// Gate created.
    GateInitialized {
        owner: Address,
        target: Address,
        cooldown_secs: u64,
        expiration_secs: u64,
    },
    /// Module authorized to propose.
    ModuleEnabled { module: Address },
    /// Module authorization revoked.
    ModuleDisabled { module: Address },
    /// Call queued. Executors need `call` to release it later.
    TransactionAdded {
        index: u64,
        hash: Hash,
        module: Address,
        call: ProposedCall,
    },
    /// Call forwarded to the target and accepted.
    TransactionExecuted { index: u64, hash: Hash },
    /// Expired slots `from..to` dropped.
    TransactionsSkipped { from: u64, to: u64 },
    /// Cooldown changed.
    CooldownSet { seconds: u64 },
    /// Expiration changed.
    ExpirationSet { seconds: u64 },
    /// Owner fast-forwarded the read cursor.
    ReadCursorSet { previous: u64, current: u64 },
    /// Ownership handed over.
    OwnershipTransferred { previous: Address, current: Address },
}

impl GateEvent {
    /// Topic name used for filtering.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::GateInitialized { .. }
            | Self::CooldownSet { .. }
            | Self::ExpirationSet { .. }
            | Self::OwnershipTransferred { .. } => topics::CONFIG,
            Self::ModuleEnabled { .. } | Self::ModuleDisabled { .. } => topics::MODULES,
            Self::TransactionAdded { .. }
            | Self::TransactionExecuted { .. }
            | Self::TransactionsSkipped { .. }
            | Self::ReadCursorSet { .. } => topics::QUEUE,
        }
    }
}

/// Event plus delivery metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event id.
    pub id: Uuid,
    /// Time the state change happened.
    pub emitted_at: Timestamp,
    /// The event itself.
    pub event: GateEvent,
}

impl EventEnvelope {
    /// Wraps an event with a fresh id.
    #[must_use]
    pub fn new(event: GateEvent, emitted_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            emitted_at,
            event,
        }
    }
}

/// Topic names.
pub mod topics {
    /// Ownership and policy changes.
    pub const CONFIG: &str = "delay_gate.config";
    /// Module registry changes.
    pub const MODULES: &str = "delay_gate.modules";
    /// Queue and cursor changes.
    pub const QUEUE: &str = "delay_gate.queue";
}
