//! # Registry Configuration
//!
//! Tuning knobs loaded once at startup, typically from a TOML file:
//!
//! ```toml
//! entity_capacity = 100000
//! pool_capacity = 1024
//! generation_policy = "retire"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{EcsError, EcsResult};

/// What happens when a slot's generation counter reaches its maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPolicy {
    /// Wrap back to generation 0 and keep reusing the slot.
    ///
    /// A handle held across a full wrap (4096 reuses of one slot) can alias
    /// the newest occupant.
    Wrap,
    /// Never reuse a slot whose generation would wrap.
    ///
    /// Stale handles can never be reported alive again, at the cost of one
    /// slot per 4096 reuses.
    #[default]
    Retire,
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Entity slots to reserve up front. An allocation hint, not a limit.
    pub entity_capacity: usize,
    /// Components to reserve in each pool when it is created.
    pub pool_capacity: usize,
    /// Slot reuse policy once a generation counter is exhausted.
    pub generation_policy: GenerationPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 0,
            pool_capacity: 0,
            generation_policy: GenerationPolicy::Retire,
        }
    }
}

impl RegistryConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the text is not valid TOML or
    /// contains unknown keys or invalid values.
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        toml::from_str(text).map_err(|e| EcsError::InvalidConfig(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            EcsError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}
