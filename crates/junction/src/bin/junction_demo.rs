//! # JUNCTION Demo
//!
//! Headless movement simulation: entities drift across a bounded field,
//! leave it, and are retired at the end of the frame.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug junction_demo --entities 500 --frames 120 --config junction.toml
//! ```

use std::cell::Cell;
use std::rc::Rc;

use junction::{System, SystemRegistry, World};
use junction_core::ecs::{EntityStore, Position, Tag, Velocity};
use junction_core::events::EventBus;
use junction_core::{EntityId, JunctionConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Half-width of the square field.
const FIELD_EXTENT: f32 = 100.0;

/// Fixed timestep.
const DT: f32 = 1.0 / 60.0;

/// Emitted when an entity crosses the field boundary.
struct LeftField {
    entity: EntityId,
    position: Position,
}

/// Integrates velocity into position.
struct MovementSystem;

impl System for MovementSystem {
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

/// Detects entities outside the field and retires them through an event.
#[derive(Default)]
struct BoundsSystem {
    departed: Rc<Cell<usize>>,
}

impl System for BoundsSystem {
    fn configure(&mut self, events: &mut EventBus<EntityStore>) {
        let departed = Rc::clone(&self.departed);
        events.subscribe_with_context(move |entities: &mut EntityStore, event: &LeftField| {
            if entities.remove_entity(event.entity).is_ok() {
                departed.set(departed.get() + 1);
            }
            if entities.has_component::<Tag>(event.entity) {
                info!(
                    entity = %event.entity,
                    x = event.position.x,
                    y = event.position.y,
                    "tagged entity left the field"
                );
            }
        });
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let leaving: Vec<LeftField> = world
            .entities
            .query_of::<(Position,)>()
            .filter_map(|entity| {
                let position = *world.entities.get_component::<Position>(entity)?;
                let outside = position.x.abs() > FIELD_EXTENT || position.y.abs() > FIELD_EXTENT;
                outside.then_some(LeftField { entity, position })
            })
            .collect();

        for event in leaving {
            world.emit(event);
        }
    }
}

struct Options {
    entities: u32,
    frames: u32,
    config: Option<String>,
}

fn parse_args() -> Option<Options> {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        entities: 256,
        frames: 600,
        config: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--entities" | "-n" => {
                if let Some(value) = args.get(i + 1) {
                    options.entities = value.parse().unwrap_or(options.entities);
                    i += 1;
                }
            }
            "--frames" | "-f" => {
                if let Some(value) = args.get(i + 1) {
                    options.frames = value.parse().unwrap_or(options.frames);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                options.config = args.get(i + 1).cloned();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Usage: junction_demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --entities <NUM>    Entities to spawn (default: 256)");
                println!("  -f, --frames <NUM>      Frames to simulate (default: 600)");
                println!("  -c, --config <PATH>     TOML configuration file");
                println!("  -h, --help              Show this help");
                return None;
            }
            other => warn!(argument = other, "ignoring unknown argument"),
        }
        i += 1;
    }
    Some(options)
}

fn spawn(world: &mut World, count: u32) {
    for i in 0..count {
        let angle = i as f32 * 0.618_034 * std::f32::consts::TAU;
        let speed = 5.0 + (i % 17) as f32;
        let e = world.entities.create_entity();
        world.entities.add_component(e, Position::new(0.0, 0.0));
        world
            .entities
            .add_component(e, Velocity::new(angle.cos() * speed, angle.sin() * speed));
        if i % 8 == 0 {
            world.entities.add_component(e, Tag);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(options) = parse_args() else {
        return;
    };

    let config = match options.config.as_deref().map(|path| JunctionConfig::load(path)) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            tracing::error!(%err, "could not load configuration");
            std::process::exit(1);
        }
        None => JunctionConfig::default(),
    };

    let mut world = World::with_config(&config);
    let mut systems = SystemRegistry::new();
    let bounds = BoundsSystem::default();
    let departed = Rc::clone(&bounds.departed);

    for result in [
        systems.add_system(&mut world, MovementSystem),
        systems.add_system(&mut world, bounds),
    ] {
        if let Err(err) = result {
            tracing::error!(%err, "could not register system");
            std::process::exit(1);
        }
    }

    spawn(&mut world, options.entities);
    info!(
        entities = options.entities,
        frames = options.frames,
        elements_per_chunk = config.store.elements_per_chunk,
        "simulation starting"
    );

    for frame in 0..options.frames {
        systems.update_all(&mut world, DT);
        let removed = world.maintain();
        if removed > 0 {
            tracing::debug!(
                frame,
                removed,
                alive = world.entities.alive_count(),
                "frame retired entities"
            );
        }
        if world.entities.alive_count() == 0 {
            info!(frame, "field is empty");
            break;
        }
    }

    info!(
        departed = departed.get(),
        alive = world.entities.alive_count(),
        allocated = world.entities.entity_count(),
        "simulation finished"
    );
}
