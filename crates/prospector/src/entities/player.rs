use prospector_shared::Vec2;

use super::Inventory;
use crate::render::{DrawCommand, Sprite};

/// Something that accepts cargo.
pub trait Depot {
    /// Takes the whole of `cargo` or none of it.
    ///
    /// Returns `true` once the cargo is stored. The caller empties its hold
    /// only after a `true`.
    fn deposit(&mut self, cargo: &Inventory) -> bool;
}

/// The player's flagship and base.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// World position.
    pub position: Vec2,
    /// Set by the input layer, units per second.
    pub velocity: Vec2,
    /// Facing in radians.
    pub heading: f32,
    /// Deposited resources.
    pub storage: Inventory,
    /// Atlas sprite.
    pub sprite: Option<Sprite>,
}

impl Player {
    /// Creates a stationary player. `None` storage capacity is unbounded.
    #[must_use]
    pub fn new(position: Vec2, storage_capacity: Option<u32>) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            heading: 0.0,
            storage: Inventory::with_capacity(storage_capacity.unwrap_or(u32::MAX)),
            sprite: None,
        }
    }

    /// Integrates velocity.
    pub fn update(&mut self, dt: f32) {
        if self.velocity.length_squared() > f32::EPSILON {
            self.heading = self.velocity.angle();
            self.position += self.velocity * dt;
        }
    }

    /// Draw submission for the player.
    #[must_use]
    pub fn draw_command(&self) -> Option<DrawCommand> {
        self.sprite
            .map(|sprite| DrawCommand::sprite(sprite, self.position, self.heading))
    }
}

impl Depot for Player {
    fn deposit(&mut self, cargo: &Inventory) -> bool {
        self.storage.absorb(cargo)
    }
}
