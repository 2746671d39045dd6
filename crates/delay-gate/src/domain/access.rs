//! # Access Control
//!
//! Single-owner gate for every configuration mutator.

use crate::domain::value_objects::Address;
use crate::errors::GateError;
use serde::{Deserialize, Serialize};

/// Holds the current owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    /// Creates the gate with an initial owner.
    ///
    /// # Errors
    ///
    /// `InvalidOwner` for the zero address.
    pub fn new(owner: Address) -> Result<Self, GateError> {
        if owner.is_zero() {
            return Err(GateError::InvalidOwner);
        }
        Ok(Self { owner })
    }

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Fails unless `caller` is the owner.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for any other caller.
    pub fn ensure_owner(&self, caller: Address) -> Result<(), GateError> {
        if caller != self.owner {
            return Err(GateError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Hands ownership to `new_owner`. Returns the previous owner.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless `caller` is the owner
    /// - `InvalidOwner` for the zero address
    pub fn transfer(&mut self, caller: Address, new_owner: Address) -> Result<Address, GateError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(GateError::InvalidOwner);
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}
