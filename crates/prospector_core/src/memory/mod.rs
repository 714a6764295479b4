//! # Memory Management
//!
//! Pre-allocated entity storage.
//!
//! ## Design Philosophy
//!
//! All slots are allocated once when the world is built. During gameplay:
//! - No heap allocations
//! - No deallocations, slots are overwritten in place
//! - Iteration stops at the high-water mark, not at capacity

mod pool;

pub use pool::{EntityPool, PoolHandle};
