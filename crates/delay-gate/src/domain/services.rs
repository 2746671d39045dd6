//! # Domain Services
//!
//! Pure hashing functions. Deterministic, no side effects.

use crate::domain::entities::ProposedCall;
use crate::domain::value_objects::{Address, Bytes, CallKind, Hash, U256};
use sha3::{Digest, Keccak256};

/// Computes Keccak-256 of arbitrary data.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    Hash::new(Keccak256::digest(data).into())
}

/// Computes the identifying hash of a call.
///
/// Hash = keccak256(to ++ `value_be32` ++ data ++ operation)
///
/// The same parameters must be presented again at execution time.
#[must_use]
pub fn compute_call_hash(to: Address, value: U256, data: &Bytes, operation: CallKind) -> Hash {
    let mut value_bytes = [0u8; 32];
    value.to_big_endian(&mut value_bytes);

    let mut hasher = Keccak256::new();
    hasher.update(to.as_bytes());
    hasher.update(value_bytes);
    hasher.update(data.as_slice());
    hasher.update([operation.as_u8()]);
    Hash::new(hasher.finalize().into())
}

/// Convenience wrapper over [`compute_call_hash`].
#[must_use]
pub fn hash_call(call: &ProposedCall) -> Hash {
    compute_call_hash(call.to, call.value, &call.data, call.operation)
}

// =============================================================================
// TESTS
// =============================================================================
