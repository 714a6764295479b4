use std::f32::consts::TAU;

use prospector_shared::{Vec2, TICK_RATE};

use super::ResourceType;
use crate::render::{DrawCommand, Sprite};

/// A pooled asteroid.
///
/// `Default` is the inert state of a slot that was never generated or has
/// been recycled: no sprite and no resources.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Asteroid {
    /// World position.
    pub position: Vec2,
    /// Atlas sprite.
    pub sprite: Option<Sprite>,
    /// Rotation origin, half the sprite bounds.
    pub origin: Vec2,
    /// Current rotation in radians.
    pub rotation: f32,
    /// Spin in radians per nominal tick.
    pub rotation_speed: f32,
    /// What can be mined here.
    pub resource_type: Option<ResourceType>,
    /// Units left. Zero means depleted.
    pub resource_count: u32,
}

impl Asteroid {
    /// Advances the spin.
    pub fn update(&mut self, dt: f32) {
        self.rotation = (self.rotation + self.rotation_speed * dt * TICK_RATE as f32) % TAU;
    }

    /// Returns true if a ship may target this asteroid.
    #[inline]
    #[must_use]
    pub const fn is_minable(&self) -> bool {
        self.resource_type.is_some() && self.resource_count > 0
    }

    /// Removes up to `max` units.
    ///
    /// Returns the resource type and the units actually removed, or `None`
    /// if nothing could be taken.
    pub fn extract(&mut self, max: u32) -> Option<(ResourceType, u32)> {
        let resource = self.resource_type?;
        let amount = max.min(self.resource_count);
        if amount == 0 {
            return None;
        }
        self.resource_count -= amount;
        Some((resource, amount))
    }

    /// Draw submission for this asteroid, `None` for an inert slot.
    #[must_use]
    pub fn draw_command(&self) -> Option<DrawCommand> {
        self.sprite.map(|sprite| DrawCommand {
            origin: self.origin,
            ..DrawCommand::sprite(sprite, self.position, self.rotation)
        })
    }
}
