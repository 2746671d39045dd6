//! # Ports Layer
//!
//! - `inbound`: the API the gate exposes
//! - `outbound`: the sink, clock and publisher the gate depends on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
