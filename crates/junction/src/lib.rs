//! # JUNCTION
//!
//! World facade and system registry over [`junction_core`].
//!
//! ## Modules
//!
//! - `world`: entity store and event bus owned together
//! - `systems`: per-frame update logic keyed by type

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod systems;
pub mod world;

pub use junction_core as core;
pub use systems::{System, SystemError, SystemRegistry};
pub use world::World;
