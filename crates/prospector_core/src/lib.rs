//! # PROSPECTOR Core Engine
//!
//! The two building blocks every simulated entity sits on:
//!
//! - [`EntityPool`]: a fixed-capacity slot array sized once at startup.
//!   Tens of thousands of asteroids live here without a single per-frame
//!   allocation.
//! - [`StateMachine`]: a registry of behaviour states with exactly one
//!   active state per entity.
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in hot path** - pools are pre-allocated
//! 2. **Single writer** - one tick advances every entity sequentially
//! 3. **Weak references are handles** - never pointers into a pool
//!
//! ## Example
//!
//! ```rust,ignore
//! use prospector_core::EntityPool;
//!
//! let mut pool: EntityPool<Asteroid> = EntityPool::new(10_000);
//! let (handle, asteroid) = pool.new_entity()?;
//! asteroid.resource_count = 75_000;
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod fsm;
pub mod memory;

pub use error::{FsmError, FsmResult, PoolError, PoolResult};
pub use fsm::{State, StateKey, StateMachine, Transition};
pub use memory::{EntityPool, PoolHandle};
