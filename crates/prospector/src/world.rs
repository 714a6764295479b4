//! # World Manager
//!
//! Builds the world once, then runs the three per-frame passes:
//!
//! ```text
//! update(dt)        asteroids 0..=last_active ─> ships (spawn order) ─> player
//! draw_screen(..)   parallax background + planet (screen space)
//! draw_world(..)    asteroids, ships within view distance, player always
//! ```
//!
//! The order of `update` is fixed: a ship may see asteroid state written
//! earlier in the same frame.

use prospector_core::PoolHandle;
use prospector_shared::Vec2;

use crate::config::GameConfig;
use crate::entities::{EntityRef, Player, ResourceType, Ship, ShipId, ShipType};
use crate::error::GameResult;
use crate::events::EventSender;
use crate::fleet::Fleet;
use crate::random::WorldRng;
use crate::render::{parallax, AssetProvider, Camera, DrawCommand, RenderSink, Sprite, Texture};
use crate::sector::Sector;

/// Result of one world draw pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Entities submitted to the sink.
    pub drawn: u32,
    /// Entities skipped as too far from the camera.
    pub culled: u32,
}

/// Owner of everything in a running world.
pub struct WorldManager {
    config: GameConfig,
    sector: Sector,
    fleet: Fleet,
    /// Sprites per ship type, looked up once.
    ship_sprites: [Option<Sprite>; 2],
    background: Option<Texture>,
    planet: Option<Texture>,
}

impl WorldManager {
    /// Generates a new world.
    ///
    /// Loads a random planet and background, scatters asteroids over the
    /// region grid, places the player and spawns the starting miners.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GameError::Asset`] if a texture or sprite is
    /// missing, or a state machine error from ship construction.
    pub fn generate(
        config: GameConfig,
        assets: &mut dyn AssetProvider,
        rng: &mut WorldRng,
        events: EventSender,
    ) -> GameResult<Self> {
        let world = &config.world;

        let planet_name = format!("Planet{}", rng.next_int(1, world.planet_variants as i32 + 1));
        let background_name = format!("Background{}", rng.next_int(1, world.background_variants as i32 + 1));
        let planet = assets.load_texture(&planet_name)?;
        let background = match assets.load_texture(&background_name) {
            Ok(texture) => texture,
            Err(err) => {
                assets.release(planet);
                return Err(err.into());
            }
        };

        let sector = Sector::new(
            world.asteroid_pool_capacity,
            Player::new(world.player_start, world.player_storage_capacity),
            events,
        );
        let mut manager = Self {
            config,
            sector,
            fleet: Fleet::new(),
            ship_sprites: [None, None],
            background: Some(background),
            planet: Some(planet),
        };

        if let Err(err) = manager.populate(assets, rng) {
            manager.teardown(assets);
            return Err(err);
        }

        tracing::info!(
            seed = rng.seed(),
            asteroids = manager.sector.asteroids.len(),
            capacity = manager.sector.asteroids.capacity(),
            ships = manager.fleet.len(),
            planet = %planet_name,
            background = %background_name,
            "world generated"
        );
        Ok(manager)
    }

    /// Looks up sprites, scatters asteroids and spawns the starting miners.
    fn populate(&mut self, assets: &mut dyn AssetProvider, rng: &mut WorldRng) -> GameResult<()> {
        let atlas = &self.config.world.ship_atlas;
        self.sector.player.sprite = Some(assets.sprite(atlas, "Player")?);
        for ship_type in [ShipType::Miner, ShipType::Escort] {
            self.ship_sprites[sprite_slot(ship_type)] = Some(assets.sprite(atlas, ship_type.sprite_name())?);
        }

        populate_asteroids(&self.config, &mut self.sector, assets, rng)?;

        let spread = self.config.world.starting_miner_spread;
        for _ in 0..self.config.world.starting_miners {
            let offset = Vec2::new(
                rng.next_int(-spread, spread) as f32,
                rng.next_int(-spread, spread) as f32,
            );
            let position = self.sector.player.position + offset;
            self.spawn_ship(ShipType::Miner, position, Some(EntityRef::Player))?;
        }
        Ok(())
    }

    /// Advances asteroids, then ships, then the player.
    ///
    /// # Errors
    ///
    /// Propagates the first state machine error raised by a ship.
    pub fn update(&mut self, dt: f32) -> GameResult<()> {
        for asteroid in self.sector.asteroids.iter_mut() {
            asteroid.update(dt);
        }
        self.fleet.update(&mut self.sector, dt)?;
        self.sector.player.update(dt);
        Ok(())
    }

    /// Radius around the camera inside which entities are drawn.
    #[must_use]
    pub fn view_distance(&self, camera: &dyn Camera) -> f32 {
        self.config.render.back_buffer_width * self.config.render.view_distance_factor / camera.zoom()
    }

    /// Submits every asteroid and ship closer than the view distance, then
    /// the player.
    ///
    /// Inert asteroid slots have no sprite and are neither drawn nor
    /// counted.
    pub fn draw_world(&self, camera: &dyn Camera, sink: &mut dyn RenderSink) -> CullStats {
        let eye = camera.position();
        let view_distance = self.view_distance(camera);
        let mut stats = CullStats::default();

        let mut submit = |position: Vec2, command: Option<DrawCommand>, stats: &mut CullStats| {
            let Some(command) = command else {
                return;
            };
            if position.distance(eye) < view_distance {
                sink.draw(&command);
                stats.drawn += 1;
            } else {
                stats.culled += 1;
            }
        };

        for asteroid in self.sector.asteroids.iter() {
            submit(asteroid.position, asteroid.draw_command(), &mut stats);
        }
        for ship in self.fleet.iter() {
            submit(ship.position(), ship.draw_command(), &mut stats);
        }

        if let Some(command) = self.sector.player.draw_command() {
            sink.draw(&command);
            stats.drawn += 1;
        }
        stats
    }

    /// Draws the parallax background and the planet centred on it.
    ///
    /// Does nothing after [`WorldManager::teardown`].
    pub fn draw_screen(&self, camera: &dyn Camera, sink: &mut dyn RenderSink) {
        let Some(background) = &self.background else {
            return;
        };

        let layout = parallax(
            self.config.world.size(),
            background.size(),
            camera.zoom(),
            camera.screen_to_world(Vec2::ZERO),
        );
        sink.draw(&DrawCommand::texture(background.handle, layout.position, layout.scale));

        if let Some(planet) = &self.planet {
            let inset = Vec2::new(
                ((i64::from(background.width) - i64::from(planet.width)) / 2) as f32,
                ((i64::from(background.height) - i64::from(planet.height)) / 2) as f32,
            );
            sink.draw(&DrawCommand::texture(
                planet.handle,
                layout.position + inset * layout.scale,
                layout.scale,
            ));
        }
    }

    /// Returns the background and planet textures to the provider.
    ///
    /// Safe to call more than once.
    pub fn teardown(&mut self, assets: &mut dyn AssetProvider) {
        let mut released = 0;
        for texture in [self.background.take(), self.planet.take()].into_iter().flatten() {
            assets.release(texture);
            released += 1;
        }
        if released > 0 {
            tracing::info!(released, "world textures released");
        }
    }

    /// Spawns a ship with the configured stats for its type.
    ///
    /// # Errors
    ///
    /// Propagates state machine errors from the ship's construction.
    pub fn spawn_ship(
        &mut self,
        ship_type: ShipType,
        position: Vec2,
        owner: Option<EntityRef>,
    ) -> GameResult<ShipId> {
        let stats = self.config.stats_for(ship_type).clone();
        let sprite = self.ship_sprites[sprite_slot(ship_type)];
        self.fleet
            .spawn(ship_type, position, owner, stats, sprite, &mut self.sector)
    }

    /// Removes a ship.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GameError::UnknownShip`] if `id` is not alive.
    pub fn destroy_ship(&mut self, id: ShipId) -> GameResult<()> {
        self.fleet.destroy(id, &mut self.sector)
    }

    /// Sends a miner to work an asteroid. See [`Fleet::assign_mining_target`].
    ///
    /// # Errors
    ///
    /// As [`Fleet::assign_mining_target`].
    pub fn assign_mining_target(&mut self, id: ShipId, asteroid: PoolHandle) -> GameResult<()> {
        self.fleet.assign_mining_target(id, asteroid, &mut self.sector)
    }

    /// Orders a ship to shadow another entity. See [`Fleet::order_follow`].
    ///
    /// # Errors
    ///
    /// As [`Fleet::order_follow`].
    pub fn order_follow(&mut self, id: ShipId, target: EntityRef) -> GameResult<()> {
        self.fleet.order_follow(id, target, &mut self.sector)
    }

    /// Closest asteroid with resources left.
    #[must_use]
    pub fn nearest_minable_asteroid(&self, from: Vec2) -> Option<PoolHandle> {
        self.sector.nearest_minable_asteroid(from)
    }

    /// Looks up a ship.
    #[must_use]
    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.fleet.get(id)
    }

    /// The fleet.
    #[must_use]
    pub const fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Asteroids, player and events.
    #[must_use]
    pub const fn sector(&self) -> &Sector {
        &self.sector
    }

    /// Mutable sector, for the input layer (player velocity) and tests.
    pub fn sector_mut(&mut self) -> &mut Sector {
        &mut self.sector
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.sector.player
    }

    /// Configuration the world was built with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns true while the background textures are held.
    #[must_use]
    pub const fn holds_textures(&self) -> bool {
        self.background.is_some() || self.planet.is_some()
    }
}

impl Drop for WorldManager {
    fn drop(&mut self) {
        if self.holds_textures() {
            tracing::warn!("world dropped without teardown, textures leaked to the provider");
        }
    }
}

const fn sprite_slot(ship_type: ShipType) -> usize {
    match ship_type {
        ShipType::Miner => 0,
        ShipType::Escort => 1,
    }
}

/// Scatters asteroids over the region grid.
///
/// Every cell away from the world edge rolls for an asteroid until the pool
/// is full; an asteroid carries resources on a second roll.
fn populate_asteroids(
    config: &GameConfig,
    sector: &mut Sector,
    assets: &mut dyn AssetProvider,
    rng: &mut WorldRng,
) -> GameResult<()> {
    let world = &config.world;
    let mut saturated = false;

    let mut x = world.asteroid_region_width;
    while x < world.width - world.asteroid_region_width {
        let mut y = world.asteroid_region_height;
        while y < world.height - world.asteroid_region_height {
            if rng.percent(world.asteroid_spawn_percent) {
                if sector.asteroids.is_full() {
                    if !saturated {
                        tracing::warn!(
                            capacity = sector.asteroids.capacity(),
                            "asteroid pool full, skipping remaining cells"
                        );
                        saturated = true;
                    }
                } else {
                    let sprite_name = format!("Asteroid{}", rng.next_int(1, world.asteroid_variants as i32 + 1));
                    let sprite = assets.sprite(&world.asteroid_atlas, &sprite_name)?;

                    let (_, asteroid) = sector.asteroids.new_entity()?;
                    asteroid.sprite = Some(sprite);
                    asteroid.origin = sprite.origin();
                    asteroid.position = Vec2::new(
                        x + rng.next_int(0, world.asteroid_jitter) as f32,
                        y + rng.next_int(0, world.asteroid_jitter) as f32,
                    );
                    asteroid.rotation_speed = rng.next_double(0.0, world.asteroid_max_rotation_speed) as f32;

                    if rng.percent(world.resource_percent) {
                        let kind = rng.next_int(0, ResourceType::COUNT as i32) as usize;
                        asteroid.resource_type = Some(ResourceType::ALL[kind]);
                        asteroid.resource_count = rng.next_int(world.resource_min, world.resource_max) as u32;
                    }
                }
            }
            y += world.asteroid_region_height;
        }
        x += world.asteroid_region_width;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::events::{EventBus, GameEvent};
    use crate::headless::{FixedCamera, HeadlessAssets, RecordingSink};

    fn bare_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.world.width = 2_000.0;
        config.world.height = 2_000.0;
        config.world.asteroid_pool_capacity = 4;
        config.world.asteroid_spawn_percent = 0;
        config.world.starting_miners = 0;
        config.escort.speed = 123.0;
        config
    }

    #[test]
    fn test_spawn_uses_configured_stats_and_sprite() {
        let mut assets = HeadlessAssets::new();
        let (sender, events) = EventBus::create_pair(32);
        let mut world = WorldManager::generate(bare_config(), &mut assets, &mut WorldRng::from_seed(1), sender).unwrap();

        let escort = world.spawn_ship(ShipType::Escort, Vec2::ZERO, Some(EntityRef::Player)).unwrap();
        let ship = world.ship(escort).unwrap();
        assert_eq!(ship.body.stats.speed, 123.0);
        assert!(ship.draw_command().is_some());
        assert!(events
            .drain()
            .iter()
            .any(|e| matches!(e, GameEvent::ShipSpawned { ship_type: ShipType::Escort, .. })));

        world.destroy_ship(escort).unwrap();
        assert!(matches!(world.destroy_ship(escort), Err(GameError::UnknownShip(_))));
        world.teardown(&mut assets);
    }

    #[test]
    fn test_ships_are_culled_like_asteroids() {
        let mut assets = HeadlessAssets::new();
        let (sender, _events) = EventBus::create_pair(32);
        let mut world = WorldManager::generate(bare_config(), &mut assets, &mut WorldRng::from_seed(2), sender).unwrap();
        world.spawn_ship(ShipType::Miner, Vec2::new(100.0, 0.0), None).unwrap();
        world.spawn_ship(ShipType::Miner, Vec2::new(10_000.0, 0.0), None).unwrap();

        let mut sink = RecordingSink::new();
        let stats = world.draw_world(&FixedCamera::new(Vec2::ZERO), &mut sink);
        assert_eq!(stats, CullStats { drawn: 2, culled: 1 });
        world.teardown(&mut assets);
    }

    #[test]
    fn test_failed_background_releases_planet() {
        let mut assets = HeadlessAssets::new();
        for n in 1..=8 {
            assets.fail_on(format!("Background{n}"));
        }
        let (sender, _events) = EventBus::create_pair(32);
        let result = WorldManager::generate(bare_config(), &mut assets, &mut WorldRng::from_seed(3), sender);

        assert!(matches!(result, Err(GameError::Asset(_))));
        assert_eq!((assets.loaded(), assets.released()), (1, 1));
    }
}
