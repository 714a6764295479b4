//! # Entities
//!
//! Plain data records the behaviour states operate on.
//!
//! References between entities are never pointers. A ship names its owner
//! with an [`EntityRef`] and its mining target with a [`PoolHandle`]; both
//! are resolved through the [`crate::Sector`] on every use and may come
//! back empty.

mod asteroid;
mod inventory;
mod player;
mod ship;

pub use asteroid::Asteroid;
pub use inventory::{Inventory, ResourceType};
pub use player::{Depot, Player};
pub use ship::{Ship, ShipBody, ShipType};

use prospector_core::PoolHandle;

/// Stable id of a ship. Ids are never reused within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipId(pub u32);

impl ShipId {
    /// Position in the fleet's slot list.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Weak reference to anything with a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// The player.
    Player,
    /// A ship.
    Ship(ShipId),
    /// An asteroid slot.
    Asteroid(PoolHandle),
}
