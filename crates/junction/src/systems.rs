//! # Systems
//!
//! Named per-frame update logic, looked up by type and run against a
//! [`World`]. The registry holds no state machine of its own: it stores
//! systems, configures them once when they are added and forwards updates.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use junction_core::ecs::EntityStore;
use junction_core::events::EventBus;
use thiserror::Error;

use crate::world::World;

/// Errors returned by the system registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SystemError {
    /// A system of this type is already registered.
    #[error("system {0} is already registered")]
    Duplicate(&'static str),

    /// No system of this type is registered.
    #[error("system {0} is not registered")]
    NotFound(&'static str),
}

/// Per-frame update logic.
pub trait System: 'static {
    /// Called once when the system is added, before its first update.
    ///
    /// Systems that react to events subscribe here.
    fn configure(&mut self, _events: &mut EventBus<EntityStore>) {}

    /// Advances the system by `dt` seconds.
    fn update(&mut self, world: &mut World, dt: f32);
}

/// Object-safe view of a system with downcasting.
trait ErasedSystem {
    fn update(&mut self, world: &mut World, dt: f32);
    fn name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> ErasedSystem for S {
    fn update(&mut self, world: &mut World, dt: f32) {
        System::update(self, world, dt);
    }

    fn name(&self) -> &'static str {
        type_name::<S>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Systems keyed by type, updated in registration order.
///
/// # Example
///
/// ```rust
/// use junction::{System, SystemRegistry, World};
/// use junction_core::ecs::{Position, Velocity};
///
/// struct Movement;
///
/// impl System for Movement {
///     fn update(&mut self, world: &mut World, dt: f32) {
///         let entities = &mut world.entities;
///         let mut cursor = entities.cursor_of::<(Position, Velocity)>();
///         while let Some(id) = cursor.next(entities) {
///             let Some(&velocity) = entities.get_component::<Velocity>(id) else { continue };
///             if let Some(position) = entities.get_component_mut::<Position>(id) {
///                 position.integrate(velocity, dt);
///             }
///         }
///     }
/// }
///
/// let mut world = World::new();
/// let e = world.entities.create_entity();
/// world.entities.add_component(e, Position::new(0.0, 0.0));
/// world.entities.add_component(e, Velocity::new(2.0, 0.0));
///
/// let mut systems = SystemRegistry::new();
/// systems.add_system(&mut world, Movement).unwrap();
/// systems.update_system::<Movement>(&mut world, 0.5).unwrap();
///
/// assert_eq!(world.entities.get_component::<Position>(e), Some(&Position::new(1.0, 0.0)));
/// ```
#[derive(Default)]
pub struct SystemRegistry {
    /// Systems in registration order.
    systems: Vec<Box<dyn ErasedSystem>>,
    /// Position of each system in `systems`.
    index: HashMap<TypeId, usize>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a system and calls its `configure` hook with the world's bus.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::Duplicate`] if a system of type `S` is already
    /// registered; the new system is dropped unconfigured.
    pub fn add_system<S: System>(
        &mut self,
        world: &mut World,
        mut system: S,
    ) -> Result<(), SystemError> {
        let type_id = TypeId::of::<S>();
        if self.index.contains_key(&type_id) {
            return Err(SystemError::Duplicate(type_name::<S>()));
        }

        system.configure(&mut world.events);
        self.index.insert(type_id, self.systems.len());
        self.systems.push(Box::new(system));
        tracing::debug!(system = type_name::<S>(), "system added");
        Ok(())
    }

    /// Returns the system of type `S`, if registered.
    #[must_use]
    pub fn get_system<S: System>(&self) -> Option<&S> {
        let &position = self.index.get(&TypeId::of::<S>())?;
        self.systems.get(position)?.as_any().downcast_ref::<S>()
    }

    /// Returns the system of type `S` mutably, if registered.
    #[must_use]
    pub fn get_system_mut<S: System>(&mut self) -> Option<&mut S> {
        let &position = self.index.get(&TypeId::of::<S>())?;
        self.systems.get_mut(position)?.as_any_mut().downcast_mut::<S>()
    }

    /// Updates the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::NotFound`] if no such system is registered.
    pub fn update_system<S: System>(
        &mut self,
        world: &mut World,
        dt: f32,
    ) -> Result<(), SystemError> {
        let system = self
            .get_system_mut::<S>()
            .ok_or(SystemError::NotFound(type_name::<S>()))?;
        System::update(system, world, dt);
        Ok(())
    }

    /// Updates every system in registration order.
    pub fn update_all(&mut self, world: &mut World, dt: f32) {
        for system in &mut self.systems {
            tracing::trace!(system = system.name(), dt, "updating system");
            system.update(world, dt);
        }
    }

    /// Returns the names of the registered systems in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|system| system.name())
    }

    /// Returns the number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no system is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl std::fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
