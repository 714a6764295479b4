//! # Game Error Types
//!
//! Everything the game crate can fail with. Pool and state machine errors
//! from `prospector_core` convert into [`GameError`] with `?`.

use std::path::PathBuf;

use prospector_core::{FsmError, PoolError, PoolHandle};
use thiserror::Error;

use crate::entities::{EntityRef, ShipId};

/// Failures reported by an [`crate::render::AssetProvider`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// A texture could not be loaded.
    #[error("failed to load asset {name}: {reason}")]
    AssetLoadFailure {
        /// Asset name as requested.
        name: String,
        /// Provider-specific reason.
        reason: String,
    },

    /// The atlas has no sprite with this name.
    #[error("sprite {name} not found in atlas {atlas}")]
    SpriteNotFound {
        /// Atlas that was searched.
        atlas: String,
        /// Sprite that was requested.
        name: String,
    },
}

/// Errors loading or validating a [`crate::config::GameConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path:?}: {source}")]
    Io {
        /// File that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parse but make no sense together.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur in the game crate.
#[derive(Error, Debug)]
pub enum GameError {
    /// Asteroid pool contract violation.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// State machine contract violation.
    #[error(transparent)]
    Fsm(#[from] FsmError),

    /// Asset collaborator failure.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No live ship with this id.
    #[error("unknown ship {0:?}")]
    UnknownShip(ShipId),

    /// The asteroid exists but has nothing left to mine.
    #[error("asteroid {0:?} has no resources left")]
    TargetDepleted(PoolHandle),

    /// The reference does not resolve to anything that can be targeted.
    #[error("invalid target {0:?}")]
    InvalidTarget(EntityRef),

    /// The ship type has no behaviour for this order.
    #[error("{ship_type} ship {ship:?} cannot {order}")]
    UnsupportedOrder {
        /// Ship that received the order.
        ship: ShipId,
        /// Its type name.
        ship_type: &'static str,
        /// The rejected order.
        order: &'static str,
    },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
