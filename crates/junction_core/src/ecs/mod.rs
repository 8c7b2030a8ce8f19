//! # Entity Component System
//!
//! Pooled component storage indexed by entity id.
//!
//! ## Design Philosophy
//!
//! - Entity ids are dense indices, handed out sequentially and never reused
//! - Each component type gets one chunked pool, created on first use
//! - A 64-bit mask per entity answers existence checks and queries
//! - Type erasure stays behind the pool table; public accessors are typed

mod component;
mod entity;
mod handle;
mod mask;
mod query;
mod storage;
mod store;

pub use component::{Component, ComponentSet, Position, Tag, Velocity};
pub use entity::{Entity, EntityId, EntityState};
pub use handle::ComponentHandle;
pub use mask::{ComponentMask, MAX_COMPONENTS};
pub use query::{Query, QueryCursor};
pub use storage::ComponentPools;
pub use store::EntityStore;
