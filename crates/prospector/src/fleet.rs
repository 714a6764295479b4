//! # Fleet
//!
//! Every ship in the world, in spawn order, plus the commands the rules
//! and input layer issues to them.
//!
//! Ships live in a slot list indexed by [`ShipId`]. Destroying a ship empties
//! its slot; ids are never handed out twice, so a stale id simply stops
//! resolving.

use prospector_core::PoolHandle;
use prospector_shared::Vec2;

use crate::ai::{FollowingState, TravelingState};
use crate::config::ShipStats;
use crate::entities::{EntityRef, Ship, ShipBody, ShipId, ShipType};
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;
use crate::render::Sprite;
use crate::sector::Sector;

/// All ships, in spawn order.
#[derive(Default)]
pub struct Fleet {
    ships: Vec<Option<Ship>>,
    live: usize,
}

impl Fleet {
    /// Creates an empty fleet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live ships.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Returns true if no ship is alive.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Looks up a live ship.
    #[must_use]
    pub fn get(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id.index()).and_then(Option::as_ref)
    }

    /// Looks up a live ship mutably.
    pub fn get_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Live ships in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().flatten()
    }

    /// Builds a ship, starts it patrol-following its owner and reports it.
    ///
    /// # Errors
    ///
    /// Propagates state machine errors from the ship's construction.
    pub fn spawn(
        &mut self,
        ship_type: ShipType,
        position: Vec2,
        owner: Option<EntityRef>,
        stats: ShipStats,
        sprite: Option<Sprite>,
        sector: &mut Sector,
    ) -> GameResult<ShipId> {
        let id = ShipId(self.ships.len() as u32);
        let body = ShipBody::new(id, ship_type, position, owner, stats);

        sector.set_transponder(id, Some(position));
        let ship = match Ship::new(body, sprite, sector) {
            Ok(ship) => ship,
            Err(err) => {
                sector.set_transponder(id, None);
                return Err(err);
            }
        };

        self.ships.push(Some(ship));
        self.live += 1;

        tracing::info!(ship = id.0, kind = ship_type.name(), x = position.x, y = position.y, "ship spawned");
        sector.emit(GameEvent::ShipSpawned {
            ship: id,
            ship_type,
            position,
        });
        Ok(id)
    }

    /// Removes a ship. Anything still referring to it stops resolving.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownShip`] if `id` is not alive.
    pub fn destroy(&mut self, id: ShipId, sector: &mut Sector) -> GameResult<()> {
        let slot = self
            .ships
            .get_mut(id.index())
            .filter(|slot| slot.is_some())
            .ok_or(GameError::UnknownShip(id))?;
        *slot = None;
        self.live -= 1;

        sector.set_transponder(id, None);
        tracing::info!(ship = id.0, "ship destroyed");
        sector.emit(GameEvent::ShipDestroyed { ship: id });
        Ok(())
    }

    /// Advances every live ship by one tick, in spawn order.
    ///
    /// Each ship's transponder is refreshed right after its own update, so
    /// later ships see earlier ships' new positions.
    ///
    /// # Errors
    ///
    /// Returns the first state machine error; ships after it are not
    /// updated this tick.
    pub fn update(&mut self, sector: &mut Sector, dt: f32) -> GameResult<()> {
        for ship in self.ships.iter_mut().flatten() {
            ship.update(sector, dt)?;
            sector.set_transponder(ship.id(), Some(ship.position()));
        }
        Ok(())
    }

    /// Sends a miner to work an asteroid.
    ///
    /// # Errors
    ///
    /// - [`GameError::UnknownShip`] if `id` is not alive
    /// - [`GameError::UnsupportedOrder`] if the ship cannot mine
    /// - [`GameError::InvalidTarget`] if `asteroid` is stale
    /// - [`GameError::TargetDepleted`] if it has nothing left
    pub fn assign_mining_target(
        &mut self,
        id: ShipId,
        asteroid: PoolHandle,
        sector: &mut Sector,
    ) -> GameResult<()> {
        let ship = self.get_mut(id).ok_or(GameError::UnknownShip(id))?;
        if !ship.ship_type().can_mine() || !ship.has_state::<TravelingState>() {
            return Err(GameError::UnsupportedOrder {
                ship: id,
                ship_type: ship.ship_type().name(),
                order: "mine",
            });
        }

        let target = sector
            .asteroids
            .resolve(asteroid)
            .ok_or(GameError::InvalidTarget(EntityRef::Asteroid(asteroid)))?;
        if !target.is_minable() {
            return Err(GameError::TargetDepleted(asteroid));
        }

        ship.body.mining_target = Some(asteroid);
        ship.transition_to::<TravelingState>(sector)
    }

    /// Orders a ship to shadow another entity.
    ///
    /// Drops any mining target the ship had.
    ///
    /// # Errors
    ///
    /// - [`GameError::UnknownShip`] if `id` is not alive
    /// - [`GameError::InvalidTarget`] if `target` does not resolve or is the
    ///   ship itself
    pub fn order_follow(&mut self, id: ShipId, target: EntityRef, sector: &mut Sector) -> GameResult<()> {
        let ship = self.get_mut(id).ok_or(GameError::UnknownShip(id))?;
        if target == EntityRef::Ship(id) || sector.position_of(target).is_none() {
            return Err(GameError::InvalidTarget(target));
        }

        ship.state_mut::<FollowingState>()?.target = Some(target);
        ship.transition_to::<FollowingState>(sector)
    }
}
