use prospector_core::{State, Transition};

use super::IdleState;
use crate::entities::{EntityRef, ShipBody};
use crate::sector::Sector;

/// Shadows another entity at zero offset.
#[derive(Debug, Default)]
pub struct FollowingState {
    /// Entity to follow. Set before the state is entered.
    pub target: Option<EntityRef>,
}

impl State<ShipBody, Sector> for FollowingState {
    fn on_enter(&mut self, body: &mut ShipBody, _sector: &mut Sector) -> Transition {
        body.mining_target = None;
        Transition::Stay
    }

    fn update(&mut self, body: &mut ShipBody, sector: &mut Sector, dt: f32) -> Transition {
        let Some(position) = self.target.and_then(|target| sector.position_of(target)) else {
            self.target = None;
            return Transition::to::<IdleState>();
        };

        body.steer_towards(position, dt);
        Transition::Stay
    }
}

#[cfg(test)]
mod tests {
    use prospector_shared::Vec2;

    use super::*;
    use crate::ai::test_support::{sector, ship, DT};
    use crate::entities::{ShipId, ShipType};

    #[test]
    fn test_follow_reaches_target() {
        let (mut sector, _events) = sector();
        let mut escort = ship(&mut sector, 0, ShipType::Escort, Vec2::ZERO);
        escort.state_mut::<FollowingState>().unwrap().target = Some(EntityRef::Player);
        escort.transition_to::<FollowingState>(&mut sector).unwrap();

        for _ in 0..240 {
            escort.update(&mut sector, DT).unwrap();
        }
        assert!(escort.is_in::<FollowingState>());
        assert_eq!(escort.position(), sector.player.position);
    }

    #[test]
    fn test_vanished_target_goes_idle() {
        let (mut sector, _events) = sector();
        sector.set_transponder(ShipId(9), Some(Vec2::new(50.0, 0.0)));
        let mut escort = ship(&mut sector, 0, ShipType::Escort, Vec2::ZERO);
        escort.state_mut::<FollowingState>().unwrap().target = Some(EntityRef::Ship(ShipId(9)));
        escort.transition_to::<FollowingState>(&mut sector).unwrap();
        escort.update(&mut sector, DT).unwrap();
        assert!(escort.is_in::<FollowingState>());

        sector.set_transponder(ShipId(9), None);
        escort.update(&mut sector, DT).unwrap();
        assert!(escort.is_in::<IdleState>());
    }
}
