use prospector_core::{State, Transition};

use super::{abandon_target, MiningState};
use crate::entities::ShipBody;
use crate::sector::Sector;

/// Flies to the mining target.
#[derive(Debug, Default)]
pub struct TravelingState;

impl State<ShipBody, Sector> for TravelingState {
    fn update(&mut self, body: &mut ShipBody, sector: &mut Sector, dt: f32) -> Transition {
        let destination = body
            .mining_target
            .and_then(|handle| sector.minable_asteroid(handle))
            .map(|asteroid| asteroid.position);
        let Some(destination) = destination else {
            return abandon_target(body);
        };

        body.steer_towards(destination, dt);
        if body.within_reach(destination) {
            Transition::to::<MiningState>()
        } else {
            Transition::Stay
        }
    }
}

#[cfg(test)]
mod tests {
    use prospector_shared::Vec2;

    use super::*;
    use crate::ai::test_support::{asteroid, sector, ship, DT};
    use crate::ai::IdleState;
    use crate::entities::ShipType;

    #[test]
    fn test_travel_arrives_and_starts_mining() {
        let (mut sector, _events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(600.0, 0.0), 50);
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<TravelingState>(&mut sector).unwrap();

        // 250 u/s, reach radius 64: arrives after ~2.2s
        let mut ticks = 0;
        while miner.is_in::<TravelingState>() && ticks < 600 {
            miner.update(&mut sector, DT).unwrap();
            ticks += 1;
        }

        assert!(miner.is_in::<MiningState>());
        assert!(miner.position().distance(Vec2::new(600.0, 0.0)) <= 64.0);
        assert!((120..150).contains(&ticks));
    }

    #[test]
    fn test_recycled_target_goes_idle_within_one_tick() {
        let (mut sector, _events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(5_000.0, 0.0), 50);
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<TravelingState>(&mut sector).unwrap();
        miner.update(&mut sector, DT).unwrap();

        sector.asteroids.recycle(rock);
        miner.update(&mut sector, DT).unwrap();

        assert!(miner.is_in::<IdleState>());
        assert_eq!(miner.body.mining_target, None);
    }

    #[test]
    fn test_depleted_target_goes_idle() {
        let (mut sector, _events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(5_000.0, 0.0), 50);
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<TravelingState>(&mut sector).unwrap();

        sector.asteroids.resolve_mut(rock).unwrap().resource_count = 0;
        miner.update(&mut sector, DT).unwrap();
        assert!(miner.is_in::<IdleState>());
    }
}
