//! # Attack Simulations
//!
//! Each module drives the gate the way a hostile module, executor or target
//! would and asserts that the queue stays consistent.
