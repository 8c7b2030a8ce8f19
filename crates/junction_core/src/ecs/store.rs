//! # Entity Store
//!
//! Owns entity identities, their component masks and the per-type pools.
//!
//! ## Lifecycle
//!
//! - Ids are handed out sequentially from zero and never reused
//! - Components are constructed in place in their pool slot, which is the
//!   entity's id, and keep their address until removed
//! - `remove_entity` only marks the entity; its components are destroyed at
//!   the next `maintain` so traversals in flight stay valid

use std::any::type_name;

use super::component::{Component, ComponentSet};
use super::entity::{Entity, EntityId, EntityState};
use super::handle::ComponentHandle;
use super::mask::{ComponentMask, MAX_COMPONENTS};
use super::query::{Query, QueryCursor};
use super::storage::ComponentPools;
use crate::config::StoreConfig;
use crate::error::{EcsError, EcsResult};
use crate::registry::{TypeIdentity, TypeRegistry};

/// Entity and component storage.
///
/// # Example
///
/// ```rust
/// use junction_core::ecs::{EntityStore, Position, Tag};
///
/// let mut store = EntityStore::new();
/// let a = store.create_entity();
/// store.add_component(a, Position::new(10.0, 20.0));
/// let b = store.create_entity();
/// store.add_component(b, Position::new(20.0, 30.0));
/// store.add_component(b, Tag);
///
/// assert_eq!(store.query_of::<(Position,)>().collect::<Vec<_>>(), vec![a, b]);
/// assert_eq!(store.query_of::<(Position, Tag)>().collect::<Vec<_>>(), vec![b]);
/// assert!(store.get_component::<Tag>(a).is_none());
/// ```
#[derive(Debug)]
pub struct EntityStore {
    /// Entity records indexed by id.
    entities: Vec<Entity>,
    /// Component type identities.
    registry: TypeRegistry,
    /// One pool per component identity.
    pools: ComponentPools,
    /// Entities marked for removal at the next `maintain`.
    pending: Vec<EntityId>,
    /// Entities not yet cleaned up.
    alive: usize,
}

impl EntityStore {
    /// Creates an empty store with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates an empty store from `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config.elements_per_chunk` is zero.
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            entities: Vec::with_capacity(config.initial_entity_capacity),
            registry: TypeRegistry::new(),
            pools: ComponentPools::new(config.elements_per_chunk),
            pending: Vec::new(),
            alive: 0,
        }
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    /// Allocates the next sequential entity id.
    ///
    /// # Panics
    ///
    /// Panics if every representable id has been handed out.
    pub fn create_entity(&mut self) -> EntityId {
        self.try_create_entity().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Allocates the next sequential entity id.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityIdsExhausted`] once `u32::MAX` ids exist,
    /// since that value is reserved for [`EntityId::NULL`].
    pub fn try_create_entity(&mut self) -> EcsResult<EntityId> {
        let count = self.entities.len();
        let raw = u32::try_from(count)
            .ok()
            .filter(|&raw| raw != u32::MAX)
            .ok_or(EcsError::EntityIdsExhausted(count))?;

        let id = EntityId::from_raw(raw);
        self.entities.push(Entity::new(id));
        self.alive += 1;
        Ok(id)
    }

    /// Marks `id` for removal at the next [`maintain`](Self::maintain).
    ///
    /// Until then the entity keeps its components and still matches queries.
    /// Marking an entity twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotFound`] if `id` was never allocated or
    /// has already been cleaned up.
    pub fn remove_entity(&mut self, id: EntityId) -> EcsResult<()> {
        let entity = self
            .entities
            .get_mut(id.index())
            .ok_or(EcsError::EntityNotFound(id))?;

        match entity.state {
            EntityState::Alive => {
                entity.state = EntityState::PendingRemoval;
                self.pending.push(id);
                tracing::trace!(entity = %id, "entity marked for removal");
                Ok(())
            }
            EntityState::PendingRemoval => Ok(()),
            EntityState::Removed => Err(EcsError::EntityNotFound(id)),
        }
    }

    /// Cleans up every entity marked for removal.
    ///
    /// Destroys their components, clears their masks and retires their ids.
    /// Returns the number of entities cleaned up.
    pub fn maintain(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let mut destroyed = 0;
        let pending = std::mem::take(&mut self.pending);
        for id in &pending {
            if let Some(entity) = self.entities.get_mut(id.index()) {
                destroyed += self.pools.destroy_all(id.index(), entity.component_mask);
                entity.component_mask = ComponentMask::EMPTY;
                entity.state = EntityState::Removed;
                self.alive -= 1;
            }
        }

        tracing::debug!(
            entities = pending.len(),
            components = destroyed,
            "maintenance removed entities"
        );
        pending.len()
    }

    /// Returns `true` if `id` exists and has not been cleaned up.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entity(id).is_some_and(Entity::is_alive)
    }

    /// Returns the record for `id`, including tombstones.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub(crate) fn entity_at(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Returns the component mask of a live entity.
    #[must_use]
    pub fn mask_of(&self, id: EntityId) -> Option<ComponentMask> {
        self.entity(id)
            .filter(|entity| entity.is_alive())
            .map(|entity| entity.component_mask)
    }

    /// Returns the number of ids ever allocated.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of entities not yet cleaned up.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive
    }

    /// Returns the number of entities waiting for `maintain`.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    // ------------------------------------------------------------------
    // Component types
    // ------------------------------------------------------------------

    /// Registers `T` as a component type without attaching it anywhere.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacityExceeded`] if `T` is new and the
    /// mask has no free bit left.
    pub fn register_component<T: Component>(&mut self) -> EcsResult<TypeIdentity> {
        if let Some(identity) = self.registry.get::<T>() {
            return Ok(identity);
        }

        let next = self.registry.peek_next();
        if !ComponentMask::fits(next) {
            tracing::error!(
                component = type_name::<T>(),
                max = MAX_COMPONENTS,
                "component capacity exceeded"
            );
            return Err(EcsError::ComponentCapacityExceeded {
                type_name: type_name::<T>(),
                identity: next,
                max: MAX_COMPONENTS,
            });
        }

        Ok(self.registry.identity_of::<T>())
    }

    /// Returns the identity of `T` if it has been registered.
    #[inline]
    #[must_use]
    pub fn component_identity<T: Component>(&self) -> Option<TypeIdentity> {
        self.registry.get::<T>()
    }

    /// Returns the number of registered component types.
    #[inline]
    #[must_use]
    pub fn component_type_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the component type registry.
    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the mask for the component set `S`, or `None` if some type
    /// in it has never been registered.
    #[must_use]
    pub fn mask_for<S: ComponentSet>(&self) -> Option<ComponentMask> {
        S::mask(&self.registry)
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Attaches `value` to `id` and returns it in its pool slot.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not exist, already has a `T`, or `T` would
    /// exceed the component capacity. These are contract violations; use
    /// [`try_add_component`](Self::try_add_component) to handle them.
    pub fn add_component<T: Component>(&mut self, id: EntityId, value: T) -> &mut T {
        match self.try_add_component(id, value) {
            Ok(component) => component,
            Err(err) => panic!("{err}"),
        }
    }

    /// Attaches `value` to `id` and returns it in its pool slot.
    ///
    /// Never overwrites an existing component.
    ///
    /// # Errors
    ///
    /// - [`EcsError::EntityNotFound`] if `id` is not alive
    /// - [`EcsError::DuplicateComponent`] if `id` already has a `T`
    /// - [`EcsError::ComponentCapacityExceeded`] if `T` is new and no mask bit is free
    pub fn try_add_component<T: Component>(
        &mut self,
        id: EntityId,
        value: T,
    ) -> EcsResult<&mut T> {
        if !self.is_alive(id) {
            return Err(EcsError::EntityNotFound(id));
        }
        let identity = self.register_component::<T>()?;

        let index = id.index();
        let entity = &mut self.entities[index];
        if entity.component_mask.test(identity) {
            return Err(EcsError::DuplicateComponent {
                entity: id,
                type_name: type_name::<T>(),
            });
        }
        entity.component_mask.set(identity);

        let pool = self.pools.get_or_create::<T>(identity);
        pool.ensure_size(index + 1);
        Ok(pool.create(index, value))
    }

    /// Returns `id`'s component of type `T`, or `None` if it has none.
    #[must_use]
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        let identity = self.attached::<T>(id)?;
        self.pools.get::<T>(identity)?.get(id.index())
    }

    /// Returns `id`'s component of type `T` mutably, or `None` if it has none.
    #[must_use]
    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let identity = self.attached::<T>(id)?;
        self.pools.get_mut::<T>(identity)?.get_mut(id.index())
    }

    /// Returns `true` if `id` currently has a component of type `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, id: EntityId) -> bool {
        self.attached::<T>(id).is_some()
    }

    /// Detaches and returns `id`'s component of type `T`.
    ///
    /// Takes effect immediately: the mask bit is cleared and the slot
    /// destroyed. Returns `None` if there was no such component.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let identity = self.attached::<T>(id)?;
        self.entities[id.index()].component_mask.clear(identity);

        tracing::trace!(entity = %id, component = type_name::<T>(), "component removed");
        self.pools.get_mut::<T>(identity)?.destroy(id.index())
    }

    /// Returns the identity of `T` if `id` is alive and has it attached.
    fn attached<T: Component>(&self, id: EntityId) -> Option<TypeIdentity> {
        let identity = self.registry.get::<T>()?;
        self.entity(id)
            .filter(|entity| entity.is_alive() && entity.has_component(identity))
            .map(|_| identity)
    }

    // ------------------------------------------------------------------
    // Handles
    // ------------------------------------------------------------------

    /// Returns a non-borrowing handle to `id`'s component of type `T`.
    #[must_use]
    pub fn handle<T: Component>(&self, id: EntityId) -> Option<ComponentHandle<T>> {
        let identity = self.attached::<T>(id)?;
        let generation = self.pools.get::<T>(identity)?.generation(id.index())?;
        Some(ComponentHandle::new(id, identity, generation))
    }

    /// Resolves a handle, validating it against the current state.
    ///
    /// Returns `None` once the component the handle was taken for has been
    /// removed, even if the entity has since been given a new `T`.
    #[must_use]
    pub fn resolve<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        if !self.is_current(handle) {
            return None;
        }
        self.get_component::<T>(handle.entity())
    }

    /// Resolves a handle mutably, validating it against the current state.
    #[must_use]
    pub fn resolve_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        if !self.is_current(handle) {
            return None;
        }
        self.get_component_mut::<T>(handle.entity())
    }

    /// Returns `true` if `handle` still names the live component it was taken for.
    fn is_current<T: Component>(&self, handle: ComponentHandle<T>) -> bool {
        let Some(identity) = self.attached::<T>(handle.entity()) else {
            return false;
        };
        identity == handle.identity()
            && self
                .pools
                .get::<T>(identity)
                .and_then(|pool| pool.generation(handle.entity().index()))
                == Some(handle.generation())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Iterates over the entities whose mask contains `required`, in
    /// ascending id order.
    ///
    /// The store cannot be mutated while the query is alive; use
    /// [`cursor`](Self::cursor) for that.
    #[must_use]
    pub fn query(&self, required: ComponentMask) -> Query<'_> {
        Query::new(&self.entities, required)
    }

    /// Iterates over the entities carrying every component in `S`.
    ///
    /// Yields nothing if some type in `S` has never been registered.
    #[must_use]
    pub fn query_of<S: ComponentSet>(&self) -> Query<'_> {
        self.mask_for::<S>()
            .map_or_else(Query::empty, |mask| self.query(mask))
    }

    /// Starts a detached traversal over the entities matching `required`.
    #[must_use]
    pub fn cursor(&self, required: ComponentMask) -> QueryCursor {
        QueryCursor::new(required, self.entities.len())
    }

    /// Starts a detached traversal over the entities carrying every component in `S`.
    ///
    /// Yields nothing if some type in `S` has never been registered.
    #[must_use]
    pub fn cursor_of<S: ComponentSet>(&self) -> QueryCursor {
        self.mask_for::<S>()
            .map_or(QueryCursor::new(ComponentMask::EMPTY, 0), |mask| self.cursor(mask))
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
