//! # Memory Management
//!
//! Chunked pools backing per-type component storage.
//!
//! ## Design Philosophy
//!
//! - Memory grows chunk by chunk and is never moved or shrunk
//! - Construction and destruction are explicit, per slot
//! - Each chunk is contiguous, so scans stay cache-friendly

mod pool;

pub use pool::{ErasedPool, Pool, DEFAULT_ELEMENTS_PER_CHUNK};
