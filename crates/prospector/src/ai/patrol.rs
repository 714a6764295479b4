use std::f32::consts::TAU;

use prospector_core::{State, Transition};
use prospector_shared::Vec2;

use super::{IdleState, TravelingState};
use crate::entities::{EntityRef, ShipBody};
use crate::sector::Sector;

/// Circles a target at `patrol_radius`. The starting state of every ship.
///
/// The patrol point orbits the target at `patrol_angular_speed` and the
/// ship chases it, so the formation moves with the target.
#[derive(Debug, Default)]
pub struct PatrolFollowingState {
    /// Entity to circle, normally the owner.
    pub target: Option<EntityRef>,
    /// Current bearing of the patrol point from the target.
    angle: f32,
}

impl PatrolFollowingState {
    /// Bearing of the patrol point, radians.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }
}

impl State<ShipBody, Sector> for PatrolFollowingState {
    fn on_enter(&mut self, body: &mut ShipBody, sector: &mut Sector) -> Transition {
        // Join the orbit at the ship's current bearing
        if let Some(centre) = self.target.and_then(|target| sector.position_of(target)) {
            let offset = body.position - centre;
            if offset.length_squared() > f32::EPSILON {
                self.angle = offset.angle();
            }
        }
        Transition::Stay
    }

    fn update(&mut self, body: &mut ShipBody, sector: &mut Sector, dt: f32) -> Transition {
        if body.mining_target.is_some() && body.ship_type.can_mine() {
            return Transition::to::<TravelingState>();
        }
        let Some(centre) = self.target.and_then(|target| sector.position_of(target)) else {
            return Transition::to::<IdleState>();
        };

        self.angle = (self.angle + body.stats.patrol_angular_speed * dt) % TAU;
        let patrol_point = centre + Vec2::from_angle(self.angle) * body.stats.patrol_radius;
        body.steer_towards(patrol_point, dt);
        Transition::Stay
    }
}
