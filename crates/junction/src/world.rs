//! # World
//!
//! The entity store and the event bus, owned together.
//!
//! Events emitted through the world are dispatched with the entity store as
//! context, so handlers can react to an event by mutating entities without
//! holding references to the world.

use junction_core::ecs::EntityStore;
use junction_core::events::{EventBus, SubscriptionId};
use junction_core::JunctionConfig;

/// Entity store plus an event bus whose handlers receive the store.
///
/// # Example
///
/// ```rust
/// use junction::World;
/// use junction_core::ecs::Tag;
/// use junction_core::EntityId;
///
/// struct Spawn;
///
/// let mut world = World::new();
/// world.subscribe_with_entities(|entities, _: &Spawn| {
///     let e = entities.create_entity();
///     entities.add_component(e, Tag);
/// });
///
/// world.emit(Spawn);
/// assert!(world.entities.has_component::<Tag>(EntityId::from_raw(0)));
/// ```
#[derive(Debug, Default)]
pub struct World {
    /// Entity and component storage.
    pub entities: EntityStore,
    /// Event bus dispatching with the store as context.
    pub events: EventBus<EntityStore>,
}

impl World {
    /// Creates an empty world with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty world from a validated configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.store.elements_per_chunk` is zero. Configurations
    /// returned by [`JunctionConfig::load`] are already validated.
    #[must_use]
    pub fn with_config(config: &JunctionConfig) -> Self {
        Self {
            entities: EntityStore::with_config(&config.store),
            events: EventBus::with_config(&config.events),
        }
    }

    /// Delivers `event` to every subscriber of `E`, in subscription order.
    pub fn emit<E: 'static>(&mut self, event: E) {
        self.events.emit_with(&mut self.entities, event);
    }

    /// Subscribes a handler that only needs the event.
    pub fn subscribe<E: 'static>(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    /// Subscribes a handler that receives the entity store with each event.
    pub fn subscribe_with_entities<E: 'static>(
        &mut self,
        handler: impl FnMut(&mut EntityStore, &E) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe_with_context(handler)
    }

    /// Removes a subscription. Returns `false` if it was not found.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Cleans up entities marked for removal. Returns how many were removed.
    pub fn maintain(&mut self) -> usize {
        self.entities.maintain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::ecs::{Position, Tag};
    use junction_core::EntityId;

    struct Despawn(EntityId);

    #[test]
    fn test_handlers_mutate_entities() {
        let mut world = World::new();
        world.subscribe_with_entities(|entities, event: &Despawn| {
            entities.remove_entity(event.0).ok();
        });

        let e = world.entities.create_entity();
        world.entities.add_component(e, Position::new(1.0, 2.0));

        world.emit(Despawn(e));
        assert!(world.entities.is_alive(e));
        assert_eq!(world.maintain(), 1);
        assert!(!world.entities.is_alive(e));
    }

    #[test]
    fn test_with_config() {
        let config = JunctionConfig::from_toml_str("[store]\nelements_per_chunk = 2\n").unwrap();
        let mut world = World::with_config(&config);
        for _ in 0..5 {
            let e = world.entities.create_entity();
            world.entities.add_component(e, Tag);
        }
        assert_eq!(world.entities.query_of::<(Tag,)>().count(), 5);
    }

    #[test]
    fn test_unsubscribe() {
        let mut world = World::new();
        let id = world.subscribe_with_entities(|entities, _: &Despawn| {
            entities.create_entity();
        });
        world.emit(Despawn(EntityId::NULL));
        assert!(world.unsubscribe(id));
        world.emit(Despawn(EntityId::NULL));
        assert_eq!(world.entities.entity_count(), 1);
    }
}
