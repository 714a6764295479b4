//! # Sector
//!
//! The shared world every behaviour state sees: the asteroid pool, the
//! player and the event channel, plus where every ship currently is.
//!
//! The fleet itself is NOT part of the sector. A ship's state machine runs
//! while the fleet holds that ship mutably, so other ships are visible only
//! through their last reported position (their transponder).

use prospector_core::{EntityPool, PoolHandle};
use prospector_shared::Vec2;

use crate::entities::{Asteroid, EntityRef, Player, ShipId};
use crate::events::{EventSender, GameEvent};

/// World context handed to ship states.
pub struct Sector {
    /// Every asteroid slot, live or not.
    pub asteroids: EntityPool<Asteroid>,
    /// The player and base.
    pub player: Player,
    events: EventSender,
    transponders: Vec<Option<Vec2>>,
}

impl Sector {
    /// Creates a sector with an empty asteroid pool.
    ///
    /// # Panics
    ///
    /// Panics if `asteroid_capacity` is zero.
    #[must_use]
    pub fn new(asteroid_capacity: usize, player: Player, events: EventSender) -> Self {
        Self {
            asteroids: EntityPool::new(asteroid_capacity),
            player,
            events,
            transponders: Vec::new(),
        }
    }

    /// Current position of any entity, `None` if it no longer exists.
    #[must_use]
    pub fn position_of(&self, entity: EntityRef) -> Option<Vec2> {
        match entity {
            EntityRef::Player => Some(self.player.position),
            EntityRef::Ship(id) => self.transponders.get(id.index()).copied().flatten(),
            EntityRef::Asteroid(handle) => self.asteroids.resolve(handle).map(|a| a.position),
        }
    }

    /// Resolves `handle` if it still names an asteroid with resources.
    #[must_use]
    pub fn minable_asteroid(&self, handle: PoolHandle) -> Option<&Asteroid> {
        self.asteroids.resolve(handle).filter(|a| a.is_minable())
    }

    /// Closest asteroid with resources left.
    ///
    /// Linear scan over the pool; meant for commands, not per-tick use.
    #[must_use]
    pub fn nearest_minable_asteroid(&self, from: Vec2) -> Option<PoolHandle> {
        self.asteroids
            .iter_handles()
            .filter(|(_, asteroid)| asteroid.is_minable())
            .map(|(handle, asteroid)| (handle, asteroid.position.distance_squared(from)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }

    /// Publishes an event. Returns `false` if the channel was full or
    /// closed and the event was dropped.
    pub fn emit(&self, event: GameEvent) -> bool {
        let delivered = self.events.send(event);
        if !delivered {
            tracing::trace!(?event, "event dropped");
        }
        delivered
    }

    /// A handle onto the event channel.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Records where a ship is, or that it is gone.
    pub(crate) fn set_transponder(&mut self, ship: ShipId, position: Option<Vec2>) {
        let index = ship.index();
        if index >= self.transponders.len() {
            self.transponders.resize(index + 1, None);
        }
        self.transponders[index] = position;
    }
}
