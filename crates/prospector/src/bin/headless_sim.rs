//! # Headless Simulation
//!
//! Runs the world without a window: generates a sector, puts the starting
//! miners to work, attaches an escort and steps a fixed number of frames.
//!
//! ```text
//! headless_sim [config.toml] [frames]
//! RUST_LOG=prospector=debug headless_sim data/prospector.toml 3600
//! ```

use std::process::ExitCode;

use prospector::{
    EntityRef, FixedCamera, GameConfig, GameEvent, GameLoop, GameResult, HeadlessAssets,
    RecordingSink, ResourceType, ShipType, WorldRng,
};
use prospector_shared::{Vec2, TICK_RATE};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Frames simulated when none are given: one minute of game time.
const DEFAULT_FRAMES: u64 = 3_600;

/// Event tallies for the summary.
#[derive(Debug, Default)]
struct EventCounts {
    spawned: u32,
    destroyed: u32,
    state_changes: u32,
    depleted: u32,
    deposits: u32,
    deposited_units: u64,
}

impl EventCounts {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShipSpawned { .. } => self.spawned += 1,
            GameEvent::ShipDestroyed { .. } => self.destroyed += 1,
            GameEvent::ShipStateChanged { ship, from, to } => {
                self.state_changes += 1;
                tracing::debug!(ship = ship.0, from = from.unwrap_or("-"), to, "state changed");
            }
            GameEvent::AsteroidDepleted { ship, .. } => {
                self.depleted += 1;
                tracing::info!(ship = ship.0, "asteroid depleted");
            }
            GameEvent::CargoDeposited { ship, amount } => {
                self.deposits += 1;
                self.deposited_units += u64::from(*amount);
                tracing::info!(ship = ship.0, amount, "cargo deposited");
            }
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prospector=info,headless_sim=info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(path = %path, error = %err, "cannot load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    let frames = match args.next().map(|raw| raw.parse::<u64>()) {
        Some(Ok(frames)) => frames,
        Some(Err(err)) => {
            tracing::error!(error = %err, "frame count must be a positive integer");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_FRAMES,
    };

    match run(config, frames) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "simulation aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(config: GameConfig, frames: u64) -> GameResult<()> {
    let mut assets = HeadlessAssets::new();
    let mut rng = WorldRng::new(config.world.seed);
    tracing::info!(seed = rng.seed(), frames, "starting headless simulation");

    let mut game = GameLoop::bootstrap(config, &mut assets, &mut rng)?;
    let result = simulate(&mut game, frames);
    game.teardown(&mut assets);
    result
}

fn simulate(game: &mut GameLoop, frames: u64) -> GameResult<()> {
    let mut counts = EventCounts::default();
    for event in game.drain_events() {
        counts.record(&event);
    }

    let world = game.world_mut();
    let miners: Vec<_> = world
        .fleet()
        .iter()
        .filter(|ship| ship.ship_type() == ShipType::Miner)
        .map(|ship| (ship.id(), ship.position()))
        .collect();
    for &(miner, position) in &miners {
        match world.nearest_minable_asteroid(position) {
            Some(asteroid) => world.assign_mining_target(miner, asteroid)?,
            None => tracing::warn!(ship = miner.0, "no minable asteroid in the sector"),
        }
    }
    if let Some(&(leader, position)) = miners.first() {
        let escort = world.spawn_ship(ShipType::Escort, position + Vec2::new(-50.0, 0.0), Some(EntityRef::Player))?;
        world.order_follow(escort, EntityRef::Ship(leader))?;
    }

    let viewport = game.world().config().render.viewport();
    let dt = 1.0 / TICK_RATE as f32;
    let mut sink = RecordingSink::new();
    let mut last_stats = None;
    for _ in 0..frames {
        let camera = FixedCamera::new(game.world().player().position).with_viewport(viewport);
        sink.clear();
        last_stats = Some(game.tick(dt, &camera, &mut sink)?);
        for event in game.drain_events() {
            counts.record(&event);
        }
    }

    print_summary(game, &counts);
    if let Some(stats) = last_stats {
        tracing::info!(drawn = stats.drawn, culled = stats.culled, "last frame");
    }
    Ok(())
}

fn print_summary(game: &GameLoop, counts: &EventCounts) {
    let world = game.world();

    println!();
    println!("┌─ WORLD ────────────────────────────────────────────────────────┐");
    println!("│ Frames:             {}", game.frame_count());
    println!(
        "│ Asteroids:          {} / {}",
        world.sector().asteroids.len(),
        world.sector().asteroids.capacity()
    );
    println!("│ Ships:              {}", world.fleet().len());
    for ship in world.fleet().iter() {
        println!(
            "│   #{:<3} {:<7} {:<16} cargo {}",
            ship.id().0,
            ship.ship_type().name(),
            ship.current_state_name().unwrap_or("-"),
            ship.body.inventory.total()
        );
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ BASE STORAGE ─────────────────────────────────────────────────┐");
    for ty in ResourceType::ALL {
        println!("│ {:<18}  {}", ty.name(), world.player().storage.count(ty));
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ EVENTS ───────────────────────────────────────────────────────┐");
    println!("│ Spawned:            {}", counts.spawned);
    println!("│ Destroyed:          {}", counts.destroyed);
    println!("│ State changes:      {}", counts.state_changes);
    println!("│ Asteroids depleted: {}", counts.depleted);
    println!("│ Deposits:           {} ({} units)", counts.deposits, counts.deposited_units);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    game.stats().print_summary();
}
