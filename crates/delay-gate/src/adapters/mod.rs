//! # Adapters Layer (Outer Hexagon)
//!
//! In-process implementations of the outbound ports.

pub mod clock;
pub mod event_bus;
pub mod sink;

pub use clock::*;
pub use event_bus::*;
pub use sink::*;
