//! # Game Configuration
//!
//! Loaded once at startup from TOML. Every key is optional; missing keys
//! take the values below.
//!
//! ```toml
//! [world]
//! seed = 1337
//! starting_miners = 4
//!
//! [miner]
//! cargo_capacity = 250
//! ```

use std::path::Path;

use prospector_shared::{
    Vec2, ASTEROID_POOL_CAPACITY, ASTEROID_REGION_HEIGHT, ASTEROID_REGION_WIDTH, MAX_FRAME_DELTA,
    STARTING_MINERS, TICK_RATE, VIEW_DISTANCE_FACTOR, WORLD_HEIGHT, WORLD_WIDTH,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::ShipType;
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World generation.
    pub world: WorldConfig,
    /// Miner stats.
    #[serde(deserialize_with = "miner_stats")]
    pub miner: ShipStats,
    /// Escort stats.
    #[serde(deserialize_with = "escort_stats")]
    pub escort: ShipStats,
    /// Draw pass parameters.
    pub render: RenderConfig,
    /// Frame pacing.
    pub game_loop: GameLoopConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            miner: ShipStats::miner(),
            escort: ShipStats::escort(),
            render: RenderConfig::default(),
            game_loop: GameLoopConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for inconsistent values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`GameConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Stats for a ship type.
    #[must_use]
    pub const fn stats_for(&self, ship_type: ShipType) -> &ShipStats {
        match ship_type {
            ShipType::Miner => &self.miner,
            ShipType::Escort => &self.escort,
        }
    }

    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_owned()));

        if world.width <= 0.0 || world.height <= 0.0 {
            return invalid("world size must be positive");
        }
        if world.asteroid_region_width <= 0.0 || world.asteroid_region_height <= 0.0 {
            return invalid("asteroid region size must be positive");
        }
        if world.asteroid_pool_capacity == 0 {
            return invalid("asteroid_pool_capacity must be greater than zero");
        }
        if world.asteroid_spawn_percent > 100 || world.resource_percent > 100 {
            return invalid("percentages must be within 0..=100");
        }
        if world.resource_min < 0 || world.resource_min >= world.resource_max {
            return invalid("resource range must satisfy 0 <= resource_min < resource_max");
        }
        if world.asteroid_variants == 0 || world.planet_variants == 0 || world.background_variants == 0 {
            return invalid("asset variant counts must be at least 1");
        }
        if self.render.back_buffer_width <= 0.0 || self.render.back_buffer_height <= 0.0 {
            return invalid("back buffer size must be positive");
        }
        for ship_type in [ShipType::Miner, ShipType::Escort] {
            self.stats_for(ship_type).validate(ship_type)?;
        }
        if self.game_loop.max_frame_delta <= 0.0 {
            return invalid("max_frame_delta must be positive");
        }
        if self.game_loop.event_capacity == 0 {
            return invalid("event_capacity must be greater than zero");
        }
        Ok(())
    }
}

/// World generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Generation seed; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// World width in units.
    pub width: f32,
    /// World height in units.
    pub height: f32,
    /// Grid cell width for asteroid placement.
    pub asteroid_region_width: f32,
    /// Grid cell height for asteroid placement.
    pub asteroid_region_height: f32,
    /// Asteroid pool size.
    pub asteroid_pool_capacity: usize,
    /// Chance that a grid cell holds an asteroid.
    pub asteroid_spawn_percent: u32,
    /// Maximum offset of an asteroid inside its cell.
    pub asteroid_jitter: i32,
    /// Upper bound of asteroid spin, radians per nominal tick.
    pub asteroid_max_rotation_speed: f64,
    /// Number of `Asteroid{n}` sprites in the asteroid atlas.
    pub asteroid_variants: u32,
    /// Atlas holding the asteroid sprites.
    pub asteroid_atlas: String,
    /// Atlas holding the ship and player sprites.
    pub ship_atlas: String,
    /// Chance that an asteroid carries resources.
    pub resource_percent: u32,
    /// Smallest resource deposit.
    pub resource_min: i32,
    /// Largest resource deposit (exclusive).
    pub resource_max: i32,
    /// Player spawn point.
    pub player_start: Vec2,
    /// Capacity of the player's storage; `None` is unbounded.
    pub player_storage_capacity: Option<u32>,
    /// Miners spawned next to the player.
    pub starting_miners: u32,
    /// Maximum offset of a starting miner from the player.
    pub starting_miner_spread: i32,
    /// Number of `Planet{n}` textures.
    pub planet_variants: u32,
    /// Number of `Background{n}` textures.
    pub background_variants: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            asteroid_region_width: ASTEROID_REGION_WIDTH,
            asteroid_region_height: ASTEROID_REGION_HEIGHT,
            asteroid_pool_capacity: ASTEROID_POOL_CAPACITY,
            asteroid_spawn_percent: 20,
            asteroid_jitter: 150,
            asteroid_max_rotation_speed: 0.1,
            asteroid_variants: 4,
            asteroid_atlas: "AsteroidsAtlas".to_owned(),
            ship_atlas: "ShipsAtlas".to_owned(),
            resource_percent: 30,
            resource_min: 50_000,
            resource_max: 100_000,
            player_start: Vec2::new(500.0, 500.0),
            player_storage_capacity: None,
            starting_miners: STARTING_MINERS,
            starting_miner_spread: 200,
            planet_variants: 10,
            background_variants: 8,
        }
    }
}

impl WorldConfig {
    /// World size as a vector.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Per-type ship parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    /// Units per second.
    pub speed: f32,
    /// Cargo hold size.
    pub cargo_capacity: u32,
    /// Units extracted per tick.
    pub mining_rate: u32,
    /// Arrival distance for targets and the base.
    pub interaction_radius: f32,
    /// Orbit distance while patrol-following.
    pub patrol_radius: f32,
    /// Orbit rate while patrol-following, radians per second.
    pub patrol_angular_speed: f32,
}

impl ShipStats {
    /// Default miner stats.
    #[must_use]
    pub fn miner() -> Self {
        Self {
            speed: 250.0,
            cargo_capacity: 100,
            mining_rate: 10,
            interaction_radius: 64.0,
            patrol_radius: 150.0,
            patrol_angular_speed: 0.5,
        }
    }

    /// Checks values a ship of `ship_type` cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self, ship_type: ShipType) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(format!("{}: {msg}", ship_type.name())));

        if self.speed <= 0.0 {
            return invalid("speed must be positive");
        }
        if self.interaction_radius < 0.0 || self.patrol_radius < 0.0 {
            return invalid("interaction_radius and patrol_radius must not be negative");
        }
        if ship_type == ShipType::Miner && (self.mining_rate == 0 || self.cargo_capacity == 0) {
            return invalid("mining_rate and cargo_capacity must be greater than zero");
        }
        Ok(())
    }

    /// Default escort stats.
    #[must_use]
    pub fn escort() -> Self {
        Self {
            speed: 350.0,
            cargo_capacity: 0,
            mining_rate: 0,
            interaction_radius: 64.0,
            patrol_radius: 250.0,
            patrol_angular_speed: 0.8,
        }
    }
}

/// A ship table where every key is optional.
#[derive(Deserialize)]
struct ShipStatsPatch {
    speed: Option<f32>,
    cargo_capacity: Option<u32>,
    mining_rate: Option<u32>,
    interaction_radius: Option<f32>,
    patrol_radius: Option<f32>,
    patrol_angular_speed: Option<f32>,
}

impl ShipStatsPatch {
    fn apply(self, base: ShipStats) -> ShipStats {
        ShipStats {
            speed: self.speed.unwrap_or(base.speed),
            cargo_capacity: self.cargo_capacity.unwrap_or(base.cargo_capacity),
            mining_rate: self.mining_rate.unwrap_or(base.mining_rate),
            interaction_radius: self.interaction_radius.unwrap_or(base.interaction_radius),
            patrol_radius: self.patrol_radius.unwrap_or(base.patrol_radius),
            patrol_angular_speed: self.patrol_angular_speed.unwrap_or(base.patrol_angular_speed),
        }
    }
}

fn miner_stats<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ShipStats, D::Error> {
    ShipStatsPatch::deserialize(deserializer).map(|patch| patch.apply(ShipStats::miner()))
}

fn escort_stats<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ShipStats, D::Error> {
    ShipStatsPatch::deserialize(deserializer).map(|patch| patch.apply(ShipStats::escort()))
}

/// Draw pass parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Back buffer width in pixels.
    pub back_buffer_width: f32,
    /// Back buffer height in pixels.
    pub back_buffer_height: f32,
    /// Culling radius in back buffer widths.
    pub view_distance_factor: f32,
}

impl RenderConfig {
    /// Back buffer size as a vector.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        Vec2::new(self.back_buffer_width, self.back_buffer_height)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            back_buffer_width: 1920.0,
            back_buffer_height: 1080.0,
            view_distance_factor: VIEW_DISTANCE_FACTOR,
        }
    }
}

/// Frame pacing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameLoopConfig {
    /// Target frames per second.
    pub target_fps: u32,
    /// Largest delta fed to a single update, seconds.
    pub max_frame_delta: f32,
    /// Event channel capacity.
    pub event_capacity: usize,
    /// Log frames that blow the budget.
    pub enable_timing_logs: bool,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            target_fps: TICK_RATE,
            max_frame_delta: MAX_FRAME_DELTA,
            event_capacity: 1024,
            enable_timing_logs: true,
        }
    }
}
