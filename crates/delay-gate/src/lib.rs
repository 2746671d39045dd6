//! # Delay Gate - Timelocked Execution
//!
//! ## Purpose
//!
//! Sits between authorized modules and a target account. Modules propose
//! calls; the gate records only a hash and a timestamp per call, and anyone
//! may later release the calls to the target in strict FIFO order once their
//! cooldown has elapsed and before they expire. The owner manages modules,
//! timing policy and the read cursor.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `read_cursor <= write_cursor` | `domain/queue.rs` - `set_read_cursor()`, `advance()` |
//! | INVARIANT-2 | Slot log is append-only | `domain/queue.rs` - `push()` |
//! | INVARIANT-3 | At most one execution in flight | `domain/gate.rs` - `begin_execution()` |
//! | INVARIANT-4 | Sentinel and zero are never modules | `domain/registry.rs` - `ensure_storable()` |
//! | INVARIANT-5 | Expiration is 0 or at least 60s | `domain/entities.rs` - `validate_expiration()` |
//!
//! ## Slot Lifecycle
//!
//! | State | Condition |
//! |-------|-----------|
//! | Pending | `now < created_at + cooldown` |
//! | Executable | cooldown elapsed, not yet expired |
//! | Expired | `expiration > 0` and `now >= created_at + cooldown + expiration` |
//! | Processed | index below the read cursor |
//!
//! ## Call Hash
//!
//! `keccak256(to[20] || value[32, big-endian] || data || operation[1])`
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `ExecutionSink` | Performs released calls as the target |
//! | `Clock` | Current Unix time |
//! | `EventPublisher` | Publishes gate events |
//!
//! ## Usage Example
//!
//! ```ignore
//! use delay_gate::prelude::*;
//!
//! let service = create_test_service(GateConfig::new(owner, target, 3600, 0), now)?;
//! service.enable_module(owner, module).await?;
//!
//! let call = ProposedCall::call(recipient, payload);
//! service.propose(module, call.clone()).await?;
//!
//! // one hour later
//! service.execute_next(call).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        DelayPolicy, ExecutionTicket, GateSnapshot, ModulePage, ProposedCall, QueuedSlot,
        SlotState, MIN_EXPIRATION_SECS,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, Bytes, CallKind, Hash, Timestamp, U256};

    // Domain services
    pub use crate::domain::services::{compute_call_hash, hash_call, keccak256};

    // Aggregate
    pub use crate::domain::gate::DelayGate;
    pub use crate::domain::registry::ModuleRegistry;

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::DelayGateApi;
    pub use crate::ports::outbound::{Clock, EventPublisher, ExecutionSink};

    // Events
    pub use crate::events::{topics, EventEnvelope, GateEvent};

    // Errors
    pub use crate::errors::{GateError, SinkError};

    // Adapters
    pub use crate::adapters::{BroadcastEventBus, ManualClock, RecordingSink, SystemClock};

    // Configuration
    pub use crate::config::{GateConfig, ServiceConfig};

    // Service
    pub use crate::service::{
        create_in_memory_service, create_test_service, DelayGateService, InMemoryGateService,
        ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
