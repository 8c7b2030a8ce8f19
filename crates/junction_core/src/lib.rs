//! # JUNCTION Core
//!
//! In-process entity/component storage plus a decoupled event bus:
//! - Pooled, pointer-stable component storage indexed by entity id
//! - Component masks for O(1) existence checks and masked queries
//! - Type-erased, synchronous publish/subscribe
//!
//! ## Architecture Rules
//!
//! 1. **Stable storage** - Pools grow chunk by chunk and never move a live component
//! 2. **Explicit identities** - Type identities come from registry objects, not globals
//! 3. **Single writer** - Store and bus are driven from one thread; callers serialize
//!
//! ## Example
//!
//! ```rust
//! use junction_core::{EntityStore, EventBus};
//! use junction_core::ecs::{Position, Velocity};
//!
//! struct Moved(junction_core::EntityId);
//!
//! let mut store = EntityStore::new();
//! let mut bus = EventBus::new();
//! bus.subscribe(|event: &Moved| assert_eq!(event.0.raw(), 0));
//!
//! let e = store.create_entity();
//! store.add_component(e, Position::new(0.0, 0.0));
//! store.add_component(e, Velocity::new(1.0, 0.0));
//!
//! let mut cursor = store.cursor_of::<(Position, Velocity)>();
//! while let Some(id) = cursor.next(&store) {
//!     let velocity = *store.get_component::<Velocity>(id).unwrap();
//!     store.get_component_mut::<Position>(id).unwrap().integrate(velocity, 0.5);
//!     bus.emit(Moved(id));
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod events;
pub mod memory;
pub mod registry;

pub use config::{EventBusConfig, JunctionConfig, StoreConfig};
pub use ecs::{
    Component, ComponentHandle, ComponentMask, ComponentSet, Entity, EntityId, EntityStore,
    Query, QueryCursor,
};
pub use error::{ConfigError, EcsError, EcsResult, PoolError};
pub use events::{EventBus, Mailbox, Receive, SubscriptionId};
pub use memory::{ErasedPool, Pool};
pub use registry::{TypeIdentity, TypeRegistry};
