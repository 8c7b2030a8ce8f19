//! # Component Storage
//!
//! The pool table: one type-erased [`Pool`] per component identity, indexed
//! directly by [`TypeIdentity`]. Pools are created lazily the first time a
//! component of their type is added.

use std::any::type_name;

use super::mask::ComponentMask;
use crate::memory::{ErasedPool, Pool};
use crate::registry::TypeIdentity;

/// Table of per-type component pools.
pub struct ComponentPools {
    /// Pools indexed by component identity. `None` until first use.
    pools: Vec<Option<Box<dyn ErasedPool>>>,
    /// Chunk size for newly created pools.
    elements_per_chunk: usize,
}

impl ComponentPools {
    /// Creates an empty table whose pools use `elements_per_chunk` slots per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `elements_per_chunk` is zero.
    #[must_use]
    pub fn new(elements_per_chunk: usize) -> Self {
        assert!(elements_per_chunk > 0, "Chunk size must be greater than zero");
        Self {
            pools: Vec::new(),
            elements_per_chunk,
        }
    }

    /// Returns the number of pools that have been created.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.iter().filter(|pool| pool.is_some()).count()
    }

    /// Returns the typed pool for `identity`, if one exists.
    #[must_use]
    pub fn get<T: 'static>(&self, identity: TypeIdentity) -> Option<&Pool<T>> {
        self.pools
            .get(identity.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<Pool<T>>()
    }

    /// Returns the typed pool for `identity` mutably, if one exists.
    #[must_use]
    pub fn get_mut<T: 'static>(&mut self, identity: TypeIdentity) -> Option<&mut Pool<T>> {
        self.pools
            .get_mut(identity.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
    }

    /// Returns the typed pool for `identity`, creating it on first use.
    ///
    /// # Panics
    ///
    /// Panics if a pool of a different element type already occupies
    /// `identity`. Identities come from a single registry per store, so this
    /// only happens if identities from another registry are passed in.
    pub fn get_or_create<T: 'static>(&mut self, identity: TypeIdentity) -> &mut Pool<T> {
        let index = identity.index();
        if self.pools.len() <= index {
            self.pools.resize_with(index + 1, || None);
        }

        let elements_per_chunk = self.elements_per_chunk;
        let erased = self.pools[index].get_or_insert_with(|| {
            tracing::debug!(
                component = type_name::<T>(),
                identity = identity.raw(),
                elements_per_chunk,
                "created component pool"
            );
            Box::new(Pool::<T>::with_chunk_size(elements_per_chunk)) as Box<dyn ErasedPool>
        });

        let found = erased.element_type_name();
        erased
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
            .unwrap_or_else(|| {
                panic!(
                    "pool {identity} holds {found}, not {}",
                    type_name::<T>()
                )
            })
    }

    /// Returns the erased pool for `identity`, if one exists.
    #[must_use]
    pub fn erased(&self, identity: TypeIdentity) -> Option<&dyn ErasedPool> {
        self.pools.get(identity.index())?.as_deref()
    }

    /// Destroys the slot `index` in every pool named by `mask`.
    ///
    /// Returns the number of components destroyed.
    pub fn destroy_all(&mut self, index: usize, mask: ComponentMask) -> usize {
        let mut destroyed = 0;
        for identity in mask.identities() {
            if let Some(Some(pool)) = self.pools.get_mut(identity.index()) {
                if pool.destroy_slot(index) {
                    destroyed += 1;
                }
            }
        }
        destroyed
    }
}

impl std::fmt::Debug for ComponentPools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for pool in self.pools.iter().flatten() {
            list.entry(&format_args!(
                "{} ({} live / {})",
                pool.element_type_name(),
                pool.live_count(),
                pool.len()
            ));
        }
        list.finish()
    }
}
