use prospector_core::{State, Transition};

use super::{abandon_target, IdleState, ReturningState};
use crate::entities::ShipBody;
use crate::events::GameEvent;
use crate::sector::Sector;

/// Stationary extraction from the mining target.
///
/// Each tick moves `min(mining_rate, remaining, free cargo)` units from the
/// asteroid into the hold. A full hold or an empty asteroid is noticed on
/// the following tick, which then heads home.
#[derive(Debug, Default)]
pub struct MiningState;

impl State<ShipBody, Sector> for MiningState {
    fn update(&mut self, body: &mut ShipBody, sector: &mut Sector, _dt: f32) -> Transition {
        let Some(handle) = body.mining_target else {
            return Transition::to::<IdleState>();
        };
        let Some(asteroid) = sector.asteroids.resolve_mut(handle) else {
            return abandon_target(body);
        };

        if asteroid.resource_count == 0 || body.inventory.is_full() {
            if body.inventory.is_empty() {
                return abandon_target(body);
            }
            return Transition::to::<ReturningState>();
        }

        let room = body.stats.mining_rate.min(body.inventory.free_space());
        let Some((resource, amount)) = asteroid.extract(room) else {
            return abandon_target(body);
        };
        let depleted = asteroid.resource_count == 0;

        let stored = body.inventory.add(resource, amount);
        debug_assert_eq!(stored, amount, "extraction exceeded free cargo");

        if depleted {
            tracing::debug!(ship = body.id.0, slot = handle.index(), "asteroid depleted");
            sector.emit(GameEvent::AsteroidDepleted {
                asteroid: handle,
                ship: body.id,
            });
        }
        Transition::Stay
    }
}

#[cfg(test)]
mod tests {
    use prospector_shared::Vec2;

    use super::*;
    use crate::ai::test_support::{asteroid, sector, ship, DT};
    use crate::entities::{ResourceType, ShipType};

    #[test]
    fn test_mining_conserves_resources() {
        let (mut sector, _events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(10.0, 0.0), 1_000);
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<MiningState>(&mut sector).unwrap();

        let mut last = 1_000;
        for _ in 0..5 {
            miner.update(&mut sector, DT).unwrap();
            let left = sector.asteroids.resolve(rock).unwrap().resource_count;
            assert!(left < last);
            assert_eq!(left + miner.body.inventory.count(ResourceType::Platinum), 1_000);
            last = left;
        }
    }

    #[test]
    fn test_full_hold_returns_next_tick() {
        let (mut sector, _events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(10.0, 0.0), 1_000);
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<MiningState>(&mut sector).unwrap();

        // capacity 100 at 10 per tick
        for _ in 0..10 {
            miner.update(&mut sector, DT).unwrap();
            assert!(miner.is_in::<MiningState>());
        }
        assert!(miner.body.inventory.is_full());

        miner.update(&mut sector, DT).unwrap();
        assert!(miner.is_in::<ReturningState>());
        assert_eq!(miner.body.mining_target, Some(rock));
        assert_eq!(sector.asteroids.resolve(rock).unwrap().resource_count, 900);
    }

    #[test]
    fn test_partial_final_extraction_and_event() {
        let (mut sector, events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(10.0, 0.0), 25);
        let mut miner = ship(&mut sector, 3, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<MiningState>(&mut sector).unwrap();
        let _ = events.drain();

        for _ in 0..3 {
            miner.update(&mut sector, DT).unwrap();
        }
        assert_eq!(miner.body.inventory.total(), 25);
        assert!(miner.is_in::<MiningState>());
        assert_eq!(
            events.drain(),
            vec![GameEvent::AsteroidDepleted {
                asteroid: rock,
                ship: miner.id(),
            }]
        );

        miner.update(&mut sector, DT).unwrap();
        assert!(miner.is_in::<ReturningState>());
    }

    #[test]
    fn test_stale_target_goes_idle() {
        let (mut sector, _events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(10.0, 0.0), 500);
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<MiningState>(&mut sector).unwrap();
        miner.update(&mut sector, DT).unwrap();

        sector.asteroids.recycle(rock);
        miner.update(&mut sector, DT).unwrap();
        assert!(miner.is_in::<IdleState>());
        assert_eq!(miner.body.mining_target, None);
        // The cargo already mined stays aboard
        assert_eq!(miner.body.inventory.total(), 10);
    }

    #[test]
    fn test_depleted_with_empty_hold_goes_idle() {
        let (mut sector, _events) = sector();
        let rock = asteroid(&mut sector, Vec2::new(10.0, 0.0), 0);
        let mut miner = ship(&mut sector, 0, ShipType::Miner, Vec2::ZERO);
        miner.body.mining_target = Some(rock);
        miner.transition_to::<MiningState>(&mut sector).unwrap();

        miner.update(&mut sector, DT).unwrap();
        assert!(miner.is_in::<IdleState>());
    }
}
