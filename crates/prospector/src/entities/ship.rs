use prospector_core::{PoolHandle, State, StateKey, StateMachine};
use prospector_shared::Vec2;

use super::{EntityRef, Inventory, ShipId};
use crate::ai::{
    DepositingState, FollowingState, IdleState, MiningState, PatrolFollowingState, ReturningState,
    TravelingState,
};
use crate::config::ShipStats;
use crate::error::GameResult;
use crate::events::GameEvent;
use crate::render::{DrawCommand, Sprite};
use crate::sector::Sector;

/// Ship classes. Behaviour differs only in the registered states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipType {
    /// Mines asteroids and hauls cargo to the player.
    Miner,
    /// Guards the player; cannot mine.
    Escort,
}

impl ShipType {
    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Miner => "Miner",
            Self::Escort => "Escort",
        }
    }

    /// Sprite name inside the ship atlas.
    #[must_use]
    pub const fn sprite_name(self) -> &'static str {
        self.name()
    }

    /// Returns true if this type has the mining cycle states.
    #[must_use]
    pub const fn can_mine(self) -> bool {
        matches!(self, Self::Miner)
    }
}

/// The data half of a ship, handed to its behaviour states.
#[derive(Clone, Debug, PartialEq)]
pub struct ShipBody {
    /// Fleet id.
    pub id: ShipId,
    /// Class.
    pub ship_type: ShipType,
    /// World position.
    pub position: Vec2,
    /// Facing in radians.
    pub heading: f32,
    /// Who this ship works for. Lookup only.
    pub owner: Option<EntityRef>,
    /// Cargo hold.
    pub inventory: Inventory,
    /// Asteroid this ship is working, if any.
    pub mining_target: Option<PoolHandle>,
    /// Type stats.
    pub stats: ShipStats,
}

impl ShipBody {
    /// Creates a body with an empty hold sized by `stats`.
    #[must_use]
    pub fn new(
        id: ShipId,
        ship_type: ShipType,
        position: Vec2,
        owner: Option<EntityRef>,
        stats: ShipStats,
    ) -> Self {
        Self {
            id,
            ship_type,
            position,
            heading: 0.0,
            owner,
            inventory: Inventory::with_capacity(stats.cargo_capacity),
            mining_target: None,
            stats,
        }
    }

    /// Flies toward `target` for one tick at full speed without
    /// overshooting. Returns the distance left.
    pub fn steer_towards(&mut self, target: Vec2, dt: f32) -> f32 {
        let to_target = target - self.position;
        if to_target.length_squared() > f32::EPSILON {
            self.heading = to_target.angle();
        }
        self.position = self.position.move_towards(target, self.stats.speed * dt);
        self.position.distance(target)
    }

    /// Returns true once `point` is within interaction range.
    #[must_use]
    pub fn within_reach(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.stats.interaction_radius
    }
}

/// A ship: its data plus the state machine driving it.
pub struct Ship {
    /// Data the states operate on.
    pub body: ShipBody,
    brain: StateMachine<ShipBody, Sector>,
    sprite: Option<Sprite>,
}

impl Ship {
    /// Builds a ship, registers the states for its type and starts it
    /// patrol-following its owner.
    ///
    /// # Errors
    ///
    /// Returns a state machine error if registration or start fails.
    pub fn new(
        body: ShipBody,
        sprite: Option<Sprite>,
        sector: &mut Sector,
    ) -> GameResult<Self> {
        let mut brain = StateMachine::new();
        brain.register_state(IdleState)?;
        brain.register_state(FollowingState::default())?;
        brain.register_state(PatrolFollowingState::default())?;
        if body.ship_type.can_mine() {
            brain.register_state(TravelingState)?;
            brain.register_state(MiningState)?;
            brain.register_state(ReturningState)?;
            brain.register_state(DepositingState::default())?;
        }

        brain.state_mut::<PatrolFollowingState>()?.target = body.owner;

        let mut ship = Self {
            body,
            brain,
            sprite,
        };
        ship.transition_to::<PatrolFollowingState>(sector)?;
        Ok(ship)
    }

    /// Fleet id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ShipId {
        self.body.id
    }

    /// Class.
    #[inline]
    #[must_use]
    pub const fn ship_type(&self) -> ShipType {
        self.body.ship_type
    }

    /// World position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.position
    }

    /// The behaviour state machine, for inspection.
    #[must_use]
    pub const fn state_machine(&self) -> &StateMachine<ShipBody, Sector> {
        &self.brain
    }

    /// Name of the active state.
    #[must_use]
    pub fn current_state_name(&self) -> Option<&'static str> {
        self.brain.current_state_name()
    }

    /// Returns true if `S` is the active state.
    #[must_use]
    pub fn is_in<S: 'static>(&self) -> bool {
        self.brain.is_in::<S>()
    }

    /// Returns true if this ship has a state of type `S`.
    #[must_use]
    pub fn has_state<S: 'static>(&self) -> bool {
        self.brain.has_state::<S>()
    }

    /// Mutable access to a registered state, for configuring orders.
    ///
    /// # Errors
    ///
    /// Returns [`prospector_core::FsmError::UnknownState`] if `S` is not
    /// registered for this ship type.
    pub fn state_mut<S: State<ShipBody, Sector>>(&mut self) -> GameResult<&mut S> {
        Ok(self.brain.state_mut::<S>()?)
    }

    /// Advances the active state by one tick.
    ///
    /// # Errors
    ///
    /// Propagates state machine errors.
    pub fn update(&mut self, sector: &mut Sector, dt: f32) -> GameResult<()> {
        let before = self.snapshot();
        self.brain.update(&mut self.body, sector, dt)?;
        self.announce(before, sector);
        Ok(())
    }

    /// Forces a transition from outside the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`prospector_core::FsmError::UnknownState`] if `S` is not
    /// registered for this ship type.
    pub fn transition_to<S: State<ShipBody, Sector>>(&mut self, sector: &mut Sector) -> GameResult<()> {
        let before = self.snapshot();
        self.brain.transition_to::<S>(&mut self.body, sector)?;
        self.announce(before, sector);
        Ok(())
    }

    /// Draw submission for this ship.
    #[must_use]
    pub fn draw_command(&self) -> Option<DrawCommand> {
        self.sprite
            .map(|sprite| DrawCommand::sprite(sprite, self.body.position, self.body.heading))
    }

    /// Reports a state change made since `before` was sampled.
    fn announce(&self, before: (Option<StateKey>, u64), sector: &Sector) {
        let (from, count) = before;
        if self.brain.transition_count() == count {
            return;
        }
        if let Some(to) = self.brain.current() {
            sector.emit(GameEvent::ShipStateChanged {
                ship: self.body.id,
                from: from.map(StateKey::name),
                to: to.name(),
            });
        }
    }

    fn snapshot(&self) -> (Option<StateKey>, u64) {
        (self.brain.current(), self.brain.transition_count())
    }
}
