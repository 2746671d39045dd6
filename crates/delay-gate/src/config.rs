//! # Configuration
//!
//! Gate parameters with environment overrides.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DG_OWNER` | unset | Owner address (hex) |
//! | `DG_TARGET` | unset | Target address (hex) |
//! | `DG_COOLDOWN_SECS` | `86400` | Cooldown |
//! | `DG_EXPIRATION_SECS` | `0` | Expiration window (0 = never) |
//! | `DG_EVENT_CAPACITY` | `1024` | Event bus capacity |

use crate::adapters::event_bus::DEFAULT_EVENT_CAPACITY;
use crate::domain::entities::validate_expiration;
use crate::domain::value_objects::Address;
use crate::errors::GateError;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Default cooldown: one day.
pub const DEFAULT_COOLDOWN_SECS: u64 = 86_400;

/// Initialization parameters of a gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Initial owner.
    pub owner: Address,
    /// Execution target.
    pub target: Address,
    /// Minimum slot age before execution.
    pub cooldown_secs: u64,
    /// Execution window after the cooldown (0 = never expires).
    pub expiration_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            owner: Address::ZERO,
            target: Address::ZERO,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            expiration_secs: 0,
        }
    }
}

impl GateConfig {
    /// Creates a config from explicit values.
    #[must_use]
    pub fn new(owner: Address, target: Address, cooldown_secs: u64, expiration_secs: u64) -> Self {
        Self {
            owner,
            target,
            cooldown_secs,
            expiration_secs,
        }
    }

    /// Applies `DG_*` environment overrides on top of the defaults.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(owner) = env_address("DG_OWNER") {
            config.owner = owner;
        }
        if let Some(target) = env_address("DG_TARGET") {
            config.target = target;
        }
        if let Some(secs) = env_u64("DG_COOLDOWN_SECS") {
            config.cooldown_secs = secs;
        }
        if let Some(secs) = env_u64("DG_EXPIRATION_SECS") {
            config.expiration_secs = secs;
        }

        config
    }

    /// Runs the same checks as gate initialization.
    ///
    /// # Errors
    ///
    /// `InvalidOwner`, `ZeroTarget` or `InvalidExpiration`.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.owner.is_zero() {
            return Err(GateError::InvalidOwner);
        }
        if self.target.is_zero() {
            return Err(GateError::ZeroTarget);
        }
        validate_expiration(self.expiration_secs)
    }
}

/// Service-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Gate parameters.
    pub gate: GateConfig,
    /// Capacity of the broadcast bus built by
    /// [`create_in_memory_service`](crate::service::create_in_memory_service).
    /// Ignored when a publisher is handed to `DelayGateService::new`.
    pub event_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ServiceConfig {
    /// Wraps gate parameters with default service settings.
    #[must_use]
    pub fn for_gate(gate: GateConfig) -> Self {
        Self {
            gate,
            ..Self::default()
        }
    }

    /// Reads gate and service settings from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            gate: GateConfig::from_env(),
            event_capacity: env_u64("DG_EVENT_CAPACITY")
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }
}

fn env_address(key: &str) -> Option<Address> {
    let raw = env::var(key).ok()?;
    let parsed = Address::from_hex(&raw);
    if parsed.is_none() {
        warn!(key, "Ignoring malformed address (expected 20 hex bytes)");
    }
    parsed
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring non-numeric value");
            None
        }
    }
}
