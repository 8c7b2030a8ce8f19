//! Integration tests for the world and the system registry.

use std::cell::RefCell;
use std::rc::Rc;

use junction::{System, SystemError, SystemRegistry, World};
use junction_core::ecs::{EntityStore, Position, Velocity};
use junction_core::events::EventBus;
use junction_core::{EntityId, JunctionConfig};

#[derive(Clone, Debug, PartialEq)]
struct Collision {
    a: EntityId,
    b: EntityId,
}

struct Movement;

impl System for Movement {
    fn update(&mut self, world: &mut World, dt: f32) {
        let entities = &mut world.entities;
        let mut cursor = entities.cursor_of::<(Position, Velocity)>();
        while let Some(id) = cursor.next(entities) {
            let Some(&velocity) = entities.get_component::<Velocity>(id) else {
                continue;
            };
            if let Some(position) = entities.get_component_mut::<Position>(id) {
                position.integrate(velocity, dt);
            }
        }
    }
}

/// Emits a collision for every pair of entities closer than one unit.
struct Collisions;

impl System for Collisions {
    fn update(&mut self, world: &mut World, _dt: f32) {
        let ids: Vec<EntityId> = world.entities.query_of::<(Position,)>().collect();
        let mut hits = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let (Some(pa), Some(pb)) = (
                    world.entities.get_component::<Position>(a),
                    world.entities.get_component::<Position>(b),
                ) else {
                    continue;
                };
                if pa.distance_squared(*pb) < 1.0 {
                    hits.push(Collision { a, b });
                }
            }
        }
        for hit in hits {
            world.emit(hit);
        }
    }
}

/// Removes both participants of a collision.
struct Destruction {
    log: Rc<RefCell<Vec<Collision>>>,
}

impl System for Destruction {
    fn configure(&mut self, events: &mut EventBus<EntityStore>) {
        let log = Rc::clone(&self.log);
        events.subscribe_with_context(move |entities: &mut EntityStore, hit: &Collision| {
            log.borrow_mut().push(hit.clone());
            entities.remove_entity(hit.a).ok();
            entities.remove_entity(hit.b).ok();
        });
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        world.maintain();
    }
}

#[test]
fn test_frame_pipeline() {
    let mut world = World::with_config(&JunctionConfig::default());
    let mut systems = SystemRegistry::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    systems.add_system(&mut world, Movement).unwrap();
    systems.add_system(&mut world, Collisions).unwrap();
    systems
        .add_system(&mut world, Destruction { log: Rc::clone(&log) })
        .unwrap();

    let left = world.entities.create_entity();
    world.entities.add_component(left, Position::new(-5.0, 0.0));
    world.entities.add_component(left, Velocity::new(1.0, 0.0));

    let right = world.entities.create_entity();
    world.entities.add_component(right, Position::new(5.0, 0.0));
    world.entities.add_component(right, Velocity::new(-1.0, 0.0));

    let bystander = world.entities.create_entity();
    world.entities.add_component(bystander, Position::new(0.0, 50.0));

    for _ in 0..10 {
        systems.update_all(&mut world, 0.5);
    }

    assert_eq!(*log.borrow(), vec![Collision { a: left, b: right }]);
    assert!(!world.entities.is_alive(left));
    assert!(!world.entities.is_alive(right));
    assert!(world.entities.is_alive(bystander));
    assert_eq!(world.entities.query_of::<(Position,)>().collect::<Vec<_>>(), vec![bystander]);
}

#[test]
fn test_registry_errors() {
    let mut world = World::new();
    let mut systems = SystemRegistry::new();
    assert!(systems.is_empty());

    assert_eq!(
        systems.update_system::<Movement>(&mut world, 1.0),
        Err(SystemError::NotFound(std::any::type_name::<Movement>()))
    );

    systems.add_system(&mut world, Movement).unwrap();
    let err = systems.add_system(&mut world, Movement).unwrap_err();
    assert!(err.to_string().contains("already registered"));
    assert_eq!(systems.len(), 1);
}
