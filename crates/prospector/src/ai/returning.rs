use prospector_core::{State, Transition};

use super::DepositingState;
use crate::entities::ShipBody;
use crate::sector::Sector;

/// Hauls cargo back to the player.
#[derive(Debug, Default)]
pub struct ReturningState;

impl State<ShipBody, Sector> for ReturningState {
    fn update(&mut self, body: &mut ShipBody, sector: &mut Sector, dt: f32) -> Transition {
        let base = sector.player.position;
        body.steer_towards(base, dt);

        if body.within_reach(base) {
            Transition::to::<DepositingState>()
        } else {
            Transition::Stay
        }
    }
}

#[cfg(test)]
mod tests {
    use prospector_shared::Vec2;

    use super::*;
    use crate::ai::test_support::{sector, ship, DT};
    use crate::entities::ShipType;

    #[test]
    fn test_returning_chases_moving_base() {
        let (mut sector, _events) = sector();
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::new(-500.0, 500.0));
        miner.transition_to::<ReturningState>(&mut sector).unwrap();

        sector.player.velocity = Vec2::new(50.0, 0.0);
        for _ in 0..600 {
            sector.player.update(DT);
            miner.update(&mut sector, DT).unwrap();
            if miner.is_in::<DepositingState>() {
                break;
            }
        }

        assert!(miner.is_in::<DepositingState>());
        assert!(miner.body.within_reach(sector.player.position));
    }
}
