//! # Module Registry
//!
//! Ordered set of addresses allowed to propose.
//!
//! ## Data Structures
//!
//! - `head`: most recently enabled module
//! - `successors`: O(1) membership and next-pointer per enabled module
//!
//! `Address::SENTINEL` only exists at the API boundary, as "before the first
//! module" for `disable`/`list_paginated` and as "no more modules" in page
//! cursors. It is never stored.
//!
//! ## Invariants
//!
//! - Sentinel and zero address are never members
//! - Every member is reachable from `head` exactly once
//! - New members are inserted at the head (list order is newest first)

use crate::domain::entities::ModulePage;
use crate::domain::value_objects::Address;
use crate::errors::GateError;
use std::collections::HashMap;

/// Singly-linked module list backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    /// First module in list order.
    head: Option<Address>,
    /// Successor of every enabled module (`None` for the tail).
    successors: HashMap<Address, Option<Address>>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of enabled modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    /// True if no module is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// O(1) membership test. Always false for the sentinel.
    #[must_use]
    pub fn is_enabled(&self, module: &Address) -> bool {
        self.successors.contains_key(module)
    }

    /// Inserts `module` at the head of the list.
    ///
    /// # Errors
    ///
    /// - `InvalidModule` for the zero address or the sentinel
    /// - `AlreadyEnabled` if present
    pub fn enable(&mut self, module: Address) -> Result<(), GateError> {
        ensure_storable(module)?;
        if self.is_enabled(&module) {
            return Err(GateError::AlreadyEnabled(module));
        }

        self.successors.insert(module, self.head);
        self.head = Some(module);
        Ok(())
    }

    /// Unlinks `module`, which must directly follow `prev`.
    ///
    /// Pass `Address::SENTINEL` as `prev` to remove the first module.
    ///
    /// # Errors
    ///
    /// - `InvalidModule` for the zero address or the sentinel
    /// - `NotEnabled` if `prev` is not immediately followed by `module`
    pub fn disable(&mut self, prev: Address, module: Address) -> Result<(), GateError> {
        ensure_storable(module)?;
        if self.successor_of(&prev) != Some(module) {
            return Err(GateError::NotEnabled { prev, module });
        }

        let next = self.successors.remove(&module).flatten();
        if prev.is_sentinel() {
            self.head = next;
        } else {
            self.successors.insert(prev, next);
        }
        Ok(())
    }

    /// Returns up to `page_size` modules following `start`.
    ///
    /// `next` is the last returned module when more remain, and the sentinel
    /// once the list is exhausted. A zero page size returns an empty page
    /// whose cursor is `start` itself, so paging can resume unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidModule` if `start` is neither the sentinel nor enabled.
    pub fn list_paginated(&self, start: Address, page_size: usize) -> Result<ModulePage, GateError> {
        if !start.is_sentinel() && !self.is_enabled(&start) {
            return Err(GateError::InvalidModule(start));
        }
        if page_size == 0 {
            return Ok(ModulePage {
                modules: Vec::new(),
                next: start,
            });
        }

        let mut modules = Vec::with_capacity(page_size.min(self.len()));
        let mut current = self.successor_of(&start);
        while let Some(module) = current {
            if modules.len() == page_size {
                break;
            }
            modules.push(module);
            current = self.successors.get(&module).copied().flatten();
        }

        let next = match (current, modules.last()) {
            (Some(_), Some(last)) => *last,
            _ => Address::SENTINEL,
        };
        Ok(ModulePage { modules, next })
    }

    /// Iterates modules in list order.
    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        std::iter::successors(self.head, |m| self.successors.get(m).copied().flatten())
    }

    fn successor_of(&self, prev: &Address) -> Option<Address> {
        if prev.is_sentinel() {
            self.head
        } else {
            self.successors.get(prev).copied().flatten()
        }
    }
}

fn ensure_storable(module: Address) -> Result<(), GateError> {
    if module.is_zero() || module.is_sentinel() {
        return Err(GateError::InvalidModule(module));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
