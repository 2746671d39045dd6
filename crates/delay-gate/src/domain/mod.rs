//! # Domain Layer (Inner Hexagon)
//!
//! Pure gate logic: registry, access control, queue and the aggregate that
//! combines them. NO I/O, NO async. Time is always passed in.

pub mod access;
pub mod entities;
pub mod gate;
pub mod invariants;
pub mod queue;
pub mod registry;
pub mod services;
pub mod value_objects;

pub use access::*;
pub use entities::*;
pub use gate::*;
pub use invariants::*;
pub use queue::*;
pub use registry::*;
pub use services::*;
pub use value_objects::*;
