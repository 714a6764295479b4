//! # Simulation Constants
//!
//! Baseline values for the default configuration. Every one of these can be
//! overridden through `prospector.toml`; the constants exist so that the
//! defaults live in one place.

// =============================================================================
// WORLD LAYOUT
// =============================================================================

/// Width of the playable world in world units.
pub const WORLD_WIDTH: f32 = 50_000.0;

/// Height of the playable world in world units.
pub const WORLD_HEIGHT: f32 = 50_000.0;

/// Width of one asteroid placement cell.
pub const ASTEROID_REGION_WIDTH: f32 = 250.0;

/// Height of one asteroid placement cell.
pub const ASTEROID_REGION_HEIGHT: f32 = 250.0;

/// Maximum asteroids ever alive in one world.
pub const ASTEROID_POOL_CAPACITY: usize = 10_000;

/// Miners spawned next to the player when a world is created.
pub const STARTING_MINERS: u32 = 2;

// =============================================================================
// TIMING
// =============================================================================

/// Tick rate (updates per second).
pub const TICK_RATE: u32 = 60;

/// Largest delta time fed into a single update, in seconds.
///
/// Longer stalls (debugger, window drag) are clamped so ships do not
/// teleport across the sector.
pub const MAX_FRAME_DELTA: f32 = 0.1;

// =============================================================================
// RENDERING
// =============================================================================

/// Multiplier on the back-buffer width used for the culling radius.
pub const VIEW_DISTANCE_FACTOR: f32 = 1.1;
