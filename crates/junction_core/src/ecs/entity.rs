//! # Entity Management
//!
//! Entities are dense integer identifiers assigned sequentially from zero.
//! Each one owns a component mask recording which component types are
//! attached. Identifiers are never reused.

use std::fmt;

use super::mask::ComponentMask;
use crate::registry::TypeIdentity;

/// Unique identifier for an entity.
///
/// The value doubles as the slot index in every component pool.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Null/invalid entity ID. Never handed out by a store.
    pub const NULL: Self = Self(u32::MAX);

    /// Creates an entity ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the slot index used by component pools.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Entity(NULL)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Lifecycle state of an entity slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityState {
    /// Live and visible to queries.
    Alive,
    /// Marked by `remove_entity`; still visible until the next maintenance pass.
    PendingRemoval,
    /// Cleaned up. The slot is a tombstone and its id is never reused.
    Removed,
}

/// Entity record: identity, attached-component mask and lifecycle state.
#[derive(Clone, Copy, Debug)]
pub struct Entity {
    /// The unique identifier for this entity.
    pub id: EntityId,
    /// Bitmask of attached component types.
    pub component_mask: ComponentMask,
    /// Lifecycle state.
    pub state: EntityState,
}

impl Entity {
    /// Creates a live entity with no components.
    #[inline]
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self {
            id,
            component_mask: ComponentMask::EMPTY,
            state: EntityState::Alive,
        }
    }

    /// Returns `true` unless the entity has been cleaned up.
    ///
    /// Entities pending removal still count as alive until maintenance.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != EntityState::Removed
    }

    /// Returns `true` if the entity is marked for removal.
    #[inline]
    #[must_use]
    pub fn is_pending_removal(&self) -> bool {
        self.state == EntityState::PendingRemoval
    }

    /// Checks if this entity has a specific component.
    #[inline]
    #[must_use]
    pub const fn has_component(&self, identity: TypeIdentity) -> bool {
        self.component_mask.test(identity)
    }

    /// Returns `true` if the entity is alive and carries every component in `required`.
    #[inline]
    #[must_use]
    pub fn matches(&self, required: ComponentMask) -> bool {
        self.is_alive() && self.component_mask.contains(required)
    }
}
