//! # ECS Error Types
//!
//! Errors reported by the checked (`try_*`) registry operations and by
//! configuration loading. Absence on the primary API is never an error: it
//! surfaces as `false`, `None` or a no-op.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur in the ECS core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The handle does not refer to a live entity (stale, null or foreign).
    #[error("entity {0} is not alive")]
    EntityNotAlive(Entity),

    /// The entity already has a component of this type.
    #[error("entity {entity} already has a component of type `{component}`")]
    DuplicateComponent {
        /// The entity that was targeted.
        entity: Entity,
        /// Type name of the component.
        component: &'static str,
    },

    /// The entity has no component of this type.
    #[error("entity {entity} has no component of type `{component}`")]
    MissingComponent {
        /// The entity that was targeted.
        entity: Entity,
        /// Type name of the component.
        component: &'static str,
    },

    /// Every entity slot is in use (or retired).
    #[error("entity capacity exhausted: {max} slots")]
    CapacityExhausted {
        /// Maximum number of slots a registry can hold.
        max: u32,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for checked ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
