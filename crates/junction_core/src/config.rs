//! # Configuration
//!
//! Tunables for the entity store and the event bus, loaded once from TOML at
//! startup. Every key is optional; missing keys take their defaults.
//!
//! ```toml
//! [store]
//! elements_per_chunk = 64
//! initial_entity_capacity = 1024
//!
//! [events]
//! default_mailbox_capacity = 256
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::memory::DEFAULT_ELEMENTS_PER_CHUNK;

/// Default capacity of a queued subscriber's mailbox.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1024;

/// Entity store settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Slots per pool chunk. Must be non-zero.
    pub elements_per_chunk: usize,
    /// Entity table capacity reserved up front.
    pub initial_entity_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            elements_per_chunk: DEFAULT_ELEMENTS_PER_CHUNK,
            initial_entity_capacity: 0,
        }
    }
}

/// Event bus settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Capacity used by `subscribe_queued_default`. Must be non-zero.
    pub default_mailbox_capacity: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            default_mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JunctionConfig {
    /// Entity store settings.
    pub store: StoreConfig,
    /// Event bus settings.
    pub events: EventBusConfig,
}

impl JunctionConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`JunctionConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.elements_per_chunk == 0 {
            return Err(ConfigError::Invalid(
                "store.elements_per_chunk must be greater than zero".into(),
            ));
        }
        if self.events.default_mailbox_capacity == 0 {
            return Err(ConfigError::Invalid(
                "events.default_mailbox_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
