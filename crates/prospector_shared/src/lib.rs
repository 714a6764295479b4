//! # PROSPECTOR Shared
//!
//! Common types used by the simulation core and the game crate.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on a graphics or windowing crate.
//! Rendering is an external collaborator reached through traits in
//! `prospector::render`.

#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    ASTEROID_POOL_CAPACITY, ASTEROID_REGION_HEIGHT, ASTEROID_REGION_WIDTH, MAX_FRAME_DELTA,
    STARTING_MINERS, TICK_RATE, VIEW_DISTANCE_FACTOR, WORLD_HEIGHT, WORLD_WIDTH,
};
pub use math::Vec2;
