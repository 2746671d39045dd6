//! # Delay Gate Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── exploits/         # Attack simulations against the gate
//! │   ├── reentrancy.rs # Sinks that call back into the gate
//! │   └── ordering.rs   # Queue jumping and cursor abuse
//! │
//! └── integration/      # End-to-end flows through the service
//!     ├── flows.rs
//!     └── properties.rs # Randomized operation sequences
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gate-tests
//!
//! # By category
//! cargo test -p gate-tests integration::
//! cargo test -p gate-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p gate-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod exploits;

use delay_gate::prelude::*;

/// Owner used across the suite.
pub const OWNER: Address = Address::new([0xA0; 20]);
/// Target used across the suite.
pub const TARGET: Address = Address::new([0xB0; 20]);
/// A module the fixtures enable.
pub const MODULE: Address = Address::new([0xC0; 20]);
/// An address with no role.
pub const STRANGER: Address = Address::new([0xD0; 20]);

/// In-memory service with `MODULE` enabled, clock at zero.
///
/// # Panics
///
/// On invalid timing parameters.
pub async fn gate_with_module(cooldown: u64, expiration: u64) -> InMemoryGateService {
    let service = create_test_service(GateConfig::new(OWNER, TARGET, cooldown, expiration), 0)
        .expect("valid gate config");
    service
        .enable_module(OWNER, MODULE)
        .await
        .expect("fresh module");
    service
}

/// A distinct call per `seed`.
#[must_use]
pub fn sample_call(seed: u8) -> ProposedCall {
    ProposedCall::new(
        Address::new([seed; 20]),
        U256::from(seed),
        Bytes::from(vec![seed, seed.wrapping_add(1)]),
        CallKind::Call,
    )
}
