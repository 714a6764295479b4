//! # Mining Cycle Integration Test
//!
//! Drives miners through the world API: travel, extraction, the trip home,
//! the deposit and what happens when the target disappears mid-cycle.

use prospector::ai::{IdleState, MiningState, ReturningState, TravelingState};
use prospector::core::PoolHandle;
use prospector::shared::Vec2;
use prospector::{
    EntityRef, EventBus, EventReceiver, GameConfig, GameEvent, HeadlessAssets, ResourceType, ShipId, ShipType,
    WorldManager, WorldRng,
};

const DT: f32 = 1.0 / 60.0;

/// A world with no generated asteroids and no starting miners.
fn empty_world(assets: &mut HeadlessAssets) -> (WorldManager, EventReceiver) {
    let mut config = GameConfig::default();
    config.world.width = 4_000.0;
    config.world.height = 4_000.0;
    config.world.asteroid_pool_capacity = 8;
    config.world.asteroid_spawn_percent = 0;
    config.world.starting_miners = 0;

    let (sender, receiver) = EventBus::create_pair(1024);
    let mut rng = WorldRng::from_seed(11);
    let world = WorldManager::generate(config, assets, &mut rng, sender).unwrap();
    (world, receiver)
}

fn place_asteroid(world: &mut WorldManager, position: Vec2, resource: ResourceType, count: u32) -> PoolHandle {
    let (handle, asteroid) = world.sector_mut().asteroids.new_entity().unwrap();
    asteroid.position = position;
    asteroid.resource_type = Some(resource);
    asteroid.resource_count = count;
    handle
}

fn remaining(world: &WorldManager, handle: PoolHandle) -> u32 {
    world.sector().asteroids.resolve(handle).unwrap().resource_count
}

fn cargo(world: &WorldManager, ship: ShipId) -> u32 {
    world.ship(ship).unwrap().body.inventory.total()
}

/// Miner next to a 25-unit asteroid: three mining ticks of 10, 10 and 5,
/// then Returning on the fourth.
#[test]
fn test_partial_asteroid_depletes_in_three_ticks() {
    let mut assets = HeadlessAssets::new();
    let (mut world, events) = empty_world(&mut assets);
    let rock = place_asteroid(&mut world, Vec2::new(2_000.0, 500.0), ResourceType::Cobalt, 25);
    let miner = world
        .spawn_ship(ShipType::Miner, Vec2::new(1_990.0, 500.0), Some(EntityRef::Player))
        .unwrap();
    world.assign_mining_target(miner, rock).unwrap();
    assert!(world.ship(miner).unwrap().is_in::<TravelingState>());

    // Already within reach: the first tick only switches to Mining
    world.update(DT).unwrap();
    assert!(world.ship(miner).unwrap().is_in::<MiningState>());
    let _ = events.drain();

    let mut expected = [15, 5, 0].into_iter();
    for tick in 1..=3 {
        world.update(DT).unwrap();
        let left = remaining(&world, rock);
        assert_eq!(Some(left), expected.next(), "tick {tick}");
        assert_eq!(left + cargo(&world, miner), 25, "conservation on tick {tick}");
        assert!(world.ship(miner).unwrap().is_in::<MiningState>());
    }
    assert_eq!(cargo(&world, miner), 25);
    assert_eq!(
        events.drain(),
        vec![GameEvent::AsteroidDepleted {
            asteroid: rock,
            ship: miner,
        }]
    );

    world.update(DT).unwrap();
    let ship = world.ship(miner).unwrap();
    assert!(ship.is_in::<ReturningState>());
    assert_eq!(ship.body.mining_target, Some(rock));

    world.teardown(&mut assets);
}

/// The whole loop: out, mine, home, unload, and Idle once the rock is spent.
#[test]
fn test_full_cycle_delivers_everything() {
    let mut assets = HeadlessAssets::new();
    let (mut world, events) = empty_world(&mut assets);
    let rock = place_asteroid(&mut world, Vec2::new(1_500.0, 500.0), ResourceType::Platinum, 130);
    let miner = world
        .spawn_ship(ShipType::Miner, Vec2::new(500.0, 650.0), Some(EntityRef::Player))
        .unwrap();
    world.assign_mining_target(miner, rock).unwrap();
    let _ = events.drain();

    let mut ticks = 0;
    while !world.ship(miner).unwrap().is_in::<IdleState>() {
        world.update(DT).unwrap();
        ticks += 1;
        assert!(ticks < 10_000, "cycle never finished");
    }

    assert_eq!(remaining(&world, rock), 0);
    assert_eq!(cargo(&world, miner), 0);
    assert_eq!(world.player().storage.count(ResourceType::Platinum), 130);
    assert_eq!(world.ship(miner).unwrap().body.mining_target, None);

    let deposits: Vec<u32> = events
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::CargoDeposited { amount, .. } => Some(amount),
            _ => None,
        })
        .collect();
    // Hold capacity is 100
    assert_eq!(deposits, vec![100, 30]);

    world.teardown(&mut assets);
}

/// Recycling the target under a travelling miner sends it to Idle on its
/// next update instead of chasing a dead slot.
#[test]
fn test_recycled_target_sends_traveller_idle() {
    let mut assets = HeadlessAssets::new();
    let (mut world, _events) = empty_world(&mut assets);
    let rock = place_asteroid(&mut world, Vec2::new(3_000.0, 3_000.0), ResourceType::Iron, 500);
    let miner = world
        .spawn_ship(ShipType::Miner, Vec2::new(500.0, 500.0), Some(EntityRef::Player))
        .unwrap();
    world.assign_mining_target(miner, rock).unwrap();
    for _ in 0..10 {
        world.update(DT).unwrap();
    }
    assert!(world.ship(miner).unwrap().is_in::<TravelingState>());

    assert!(world.sector_mut().asteroids.recycle(rock));
    let held = world.ship(miner).unwrap().position();
    world.update(DT).unwrap();

    let ship = world.ship(miner).unwrap();
    assert!(ship.is_in::<IdleState>());
    assert_eq!(ship.body.mining_target, None);
    assert_eq!(ship.position(), held);

    world.teardown(&mut assets);
}

/// Two miners on one asteroid never take more than it holds.
#[test]
fn test_shared_asteroid_never_goes_negative() {
    let mut assets = HeadlessAssets::new();
    let (mut world, _events) = empty_world(&mut assets);
    let rock = place_asteroid(&mut world, Vec2::new(1_000.0, 1_000.0), ResourceType::Nickel, 37);
    let a = world
        .spawn_ship(ShipType::Miner, Vec2::new(990.0, 1_000.0), Some(EntityRef::Player))
        .unwrap();
    let b = world
        .spawn_ship(ShipType::Miner, Vec2::new(1_010.0, 1_000.0), Some(EntityRef::Player))
        .unwrap();
    world.assign_mining_target(a, rock).unwrap();
    world.assign_mining_target(b, rock).unwrap();

    for _ in 0..6 {
        world.update(DT).unwrap();
        assert_eq!(remaining(&world, rock) + cargo(&world, a) + cargo(&world, b), 37);
    }
    assert_eq!(remaining(&world, rock), 0);

    world.teardown(&mut assets);
}
