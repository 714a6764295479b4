//! # PROSPECTOR
//!
//! The game core of a 2D space-mining sim: a world of asteroids, a player
//! base and a fleet of autonomous ships.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           GameLoop                               │
//! │   clamp dt ─> WorldManager::update ─> draw_screen ─> draw_world  │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                         WorldManager                             │
//! │                                                                  │
//! │  ┌──────────────────────┐        ┌──────────────────────────┐    │
//! │  │ Sector               │<───────│ Fleet                    │    │
//! │  │  • EntityPool<Aster.>│  ships │  • Ship = body + brain   │    │
//! │  │  • Player (depot)    │  read  │  • StateMachine<Body,    │    │
//! │  │  • transponders      │  write │    Sector> per ship      │    │
//! │  │  • EventSender       │        │  • ai::* states          │    │
//! │  └──────────────────────┘        └──────────────────────────┘    │
//! │                                                                  │
//! │  AssetProvider ── RenderSink ── Camera   (host side, traits)     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `ai`: ship behaviour states
//! - `config`: TOML configuration
//! - `entities`: asteroids, ships, the player and cargo holds
//! - `events`: notifications for UI and logging
//! - `fleet`: ship ownership and orders
//! - `game_loop`: frame orchestration and timing
//! - `headless`: in-memory render collaborators
//! - `render`: the draw command model and host traits
//! - `world`: generation, update and drawing

#![deny(unsafe_code)]

pub mod ai;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod fleet;
pub mod game_loop;
pub mod headless;
pub mod random;
pub mod render;
pub mod sector;
pub mod world;

pub use prospector_core as core;
pub use prospector_shared as shared;

pub use config::{GameConfig, GameLoopConfig, RenderConfig, ShipStats, WorldConfig};
pub use entities::{Asteroid, Depot, EntityRef, Inventory, Player, ResourceType, Ship, ShipBody, ShipId, ShipType};
pub use error::{AssetError, ConfigError, GameError, GameResult};
pub use events::{EventBus, EventReceiver, EventSender, GameEvent};
pub use fleet::Fleet;
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop};
pub use headless::{FixedCamera, HeadlessAssets, RecordingSink};
pub use random::WorldRng;
pub use render::{AssetProvider, Camera, DrawCommand, DrawSource, RenderSink, Sprite, Texture, TextureHandle};
pub use sector::Sector;
pub use world::{CullStats, WorldManager};
