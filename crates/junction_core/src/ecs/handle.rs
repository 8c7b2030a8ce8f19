//! # Component Handles
//!
//! A handle names a component by `(pool identity, entity slot, slot
//! generation)` instead of by reference. It holds no borrow, so it can be kept
//! across frames, and it is validated against the store every time it is
//! resolved. The generation tells a later component in the same slot apart
//! from the one the handle was taken for.

use std::fmt;
use std::marker::PhantomData;

use super::entity::EntityId;
use crate::registry::TypeIdentity;

/// Typed, non-borrowing reference to a component of type `T`.
///
/// Resolve it with [`EntityStore::resolve`](super::EntityStore::resolve). A
/// handle whose component has been removed, or whose entity has been
/// maintained away, resolves to `None`.
pub struct ComponentHandle<T> {
    entity: EntityId,
    identity: TypeIdentity,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentHandle<T> {
    pub(crate) const fn new(entity: EntityId, identity: TypeIdentity, generation: u32) -> Self {
        Self {
            entity,
            identity,
            generation,
            _marker: PhantomData,
        }
    }

    /// Returns the entity the component belongs to.
    #[inline]
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Returns the identity of the pool holding the component.
    #[inline]
    #[must_use]
    pub const fn identity(&self) -> TypeIdentity {
        self.identity
    }

    /// Returns the slot generation the handle was taken at.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
            && self.identity == other.identity
            && self.generation == other.generation
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("component", &std::any::type_name::<T>())
            .field("entity", &self.entity)
            .field("identity", &self.identity)
            .field("generation", &self.generation)
            .finish()
    }
}
