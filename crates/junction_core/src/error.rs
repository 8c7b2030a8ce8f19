//! # Core Error Types
//!
//! All errors that can occur in the entity store, the pools and the
//! configuration loader.
//!
//! The checked `try_*` operations return these. Their non-`try` counterparts
//! treat the same conditions as contract violations and panic with the
//! error's message at the violating call.

use thiserror::Error;

use crate::ecs::EntityId;
use crate::registry::TypeIdentity;

/// Errors returned by the checked pool accessors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The index lies beyond the pool's current size.
    #[error("pool index {index} out of range (size {size})")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The pool's logical size.
        size: usize,
    },

    /// The slot exists but holds no constructed element.
    #[error("pool slot {0} is vacant")]
    Vacant(usize),
}

/// Errors that can occur in the entity store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// More distinct component types than the mask can represent.
    #[error("component capacity exceeded: {type_name} needs identity {identity}, max is {max}")]
    ComponentCapacityExceeded {
        /// Name of the type that could not be registered.
        type_name: &'static str,
        /// The identity it would have received.
        identity: TypeIdentity,
        /// The mask width.
        max: usize,
    },

    /// The entity already carries a component of this type.
    #[error("{entity} already has component {type_name}")]
    DuplicateComponent {
        /// The entity.
        entity: EntityId,
        /// The component type.
        type_name: &'static str,
    },

    /// The entity id was never allocated or has been removed.
    #[error("{0} not found")]
    EntityNotFound(EntityId),

    /// Every representable entity id has been handed out.
    #[error("entity ids exhausted after {0} allocations")]
    EntityIdsExhausted(usize),
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML could not be parsed into the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value was parsed but is not usable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for entity store operations.
pub type EcsResult<T> = Result<T, EcsError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
