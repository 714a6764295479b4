//! The per-entity state machine.

use std::any::TypeId;
use std::collections::HashMap;

use super::state::{State, StateKey, Transition};
use crate::error::{FsmError, FsmResult};

/// A registered state and its key.
struct Entry<E, W> {
    #[allow(dead_code)]
    key: StateKey,
    state: Box<dyn State<E, W>>,
}

/// Registry of behaviour states with exactly zero or one active state.
///
/// States are registered once when the entity is built, configured through
/// [`StateMachine::state_mut`], then activated with [`StateMachine::start`].
///
/// # Example
///
/// ```rust,ignore
/// let mut brain: StateMachine<ShipBody, Sector> = StateMachine::new();
/// brain.register_state(IdleState)?;
/// brain.register_state(PatrolFollowState::default())?;
///
/// brain.state_mut::<PatrolFollowState>()?.target = Some(owner);
/// brain.start::<PatrolFollowState>(&mut body, &mut sector)?;
/// ```
pub struct StateMachine<E, W> {
    /// Registered states keyed by concrete type.
    states: HashMap<TypeId, Entry<E, W>>,
    /// Currently active state.
    active: Option<StateKey>,
    /// Number of states entered so far.
    transitions: u64,
}

impl<E: 'static, W: 'static> StateMachine<E, W> {
    /// Creates an empty state machine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            active: None,
            transitions: 0,
        }
    }

    /// Adds a state keyed by its concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::DuplicateState`] if a state of the same type is
    /// already registered.
    pub fn register_state<S: State<E, W>>(&mut self, state: S) -> FsmResult<()> {
        let key = StateKey::of::<S>();
        if self.states.contains_key(&key.id()) {
            return Err(FsmError::DuplicateState(key.name()));
        }

        self.states.insert(
            key.id(),
            Entry {
                key,
                state: Box::new(state),
            },
        );
        Ok(())
    }

    /// Returns true if a state of type `S` is registered.
    #[must_use]
    pub fn has_state<S: 'static>(&self) -> bool {
        self.states.contains_key(&TypeId::of::<S>())
    }

    /// Number of registered states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Looks up a registered state without activating it.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::UnknownState`] if `S` was never registered.
    pub fn state<S: State<E, W>>(&self) -> FsmResult<&S> {
        let unknown = || FsmError::UnknownState(StateKey::of::<S>().name());
        let entry = self.states.get(&TypeId::of::<S>()).ok_or_else(unknown)?;
        let state: &dyn State<E, W> = entry.state.as_ref();
        state.as_any().downcast_ref::<S>().ok_or_else(unknown)
    }

    /// Looks up a registered state mutably without activating it.
    ///
    /// Used to configure parameters (a follow target, say) before the state
    /// is entered.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::UnknownState`] if `S` was never registered.
    pub fn state_mut<S: State<E, W>>(&mut self) -> FsmResult<&mut S> {
        let unknown = || FsmError::UnknownState(StateKey::of::<S>().name());
        let entry = self.states.get_mut(&TypeId::of::<S>()).ok_or_else(unknown)?;
        let state: &mut dyn State<E, W> = entry.state.as_mut();
        state.as_any_mut().downcast_mut::<S>().ok_or_else(unknown)
    }

    /// Activates state `S` and runs its enter hook.
    ///
    /// Calling `start` on a running machine performs a normal transition.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::UnknownState`] if `S` (or a state chained from its
    /// enter hook) is not registered, or [`FsmError::TransitionLoop`] if
    /// enter hooks keep chaining.
    pub fn start<S: State<E, W>>(&mut self, entity: &mut E, world: &mut W) -> FsmResult<()> {
        self.switch_to(StateKey::of::<S>(), entity, world)
    }

    /// Forces a transition to `S` from outside the active state.
    ///
    /// This is the entry point for external commands.
    ///
    /// # Errors
    ///
    /// Same as [`StateMachine::start`].
    pub fn transition_to<S: State<E, W>>(
        &mut self,
        entity: &mut E,
        world: &mut W,
    ) -> FsmResult<()> {
        self.switch_to(StateKey::of::<S>(), entity, world)
    }

    /// Advances the active state by one tick.
    ///
    /// A transition requested by the active state is applied before this
    /// call returns.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::NotStarted`] before `start`, or any error of the
    /// requested transition.
    pub fn update(&mut self, entity: &mut E, world: &mut W, dt: f32) -> FsmResult<()> {
        let active = self.active.ok_or(FsmError::NotStarted)?;
        let entry = self
            .states
            .get_mut(&active.id())
            .ok_or(FsmError::UnknownState(active.name()))?;

        match entry.state.update(entity, world, dt) {
            Transition::Stay => Ok(()),
            Transition::To(next) => self.switch_to(next, entity, world),
        }
    }

    /// Returns the key of the active state.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Option<StateKey> {
        self.active
    }

    /// Returns the name of the active state.
    #[must_use]
    pub fn current_state_name(&self) -> Option<&'static str> {
        self.active.map(StateKey::name)
    }

    /// Returns true if `S` is the active state.
    #[must_use]
    pub fn is_in<S: 'static>(&self) -> bool {
        self.active.is_some_and(|key| key.id() == TypeId::of::<S>())
    }

    /// Number of states entered since construction.
    #[inline]
    #[must_use]
    pub const fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Exits the current state (if any) and enters `next`, following any
    /// chain requested by enter hooks.
    fn switch_to(&mut self, mut next: StateKey, entity: &mut E, world: &mut W) -> FsmResult<()> {
        let limit = self.states.len();
        let mut hops = 0;

        loop {
            if !self.states.contains_key(&next.id()) {
                return Err(FsmError::UnknownState(next.name()));
            }
            if hops >= limit {
                return Err(FsmError::TransitionLoop {
                    state: next.name(),
                    limit,
                });
            }
            hops += 1;

            if let Some(current) = self.active.take() {
                if let Some(entry) = self.states.get_mut(&current.id()) {
                    entry.state.on_exit(entity, world);
                }
                tracing::debug!(from = current.name(), to = next.name(), "state transition");
            } else {
                tracing::debug!(to = next.name(), "state machine started");
            }

            self.active = Some(next);
            self.transitions += 1;

            let entry = self
                .states
                .get_mut(&next.id())
                .ok_or(FsmError::UnknownState(next.name()))?;
            match entry.state.on_enter(entity, world) {
                Transition::Stay => return Ok(()),
                Transition::To(chained) => next = chained,
            }
        }
    }
}

impl<E: 'static, W: 'static> Default for StateMachine<E, W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Entity record used by the tests.
    #[derive(Default)]
    struct Probe {
        log: Vec<&'static str>,
        fuel: u32,
    }

    /// World stand-in.
    #[derive(Default)]
    struct Dock {
        ticks: u32,
    }

    #[derive(Default)]
    struct Parked {
        enters: u32,
    }

    impl State<Probe, Dock> for Parked {
        fn on_enter(&mut self, probe: &mut Probe, _dock: &mut Dock) -> Transition {
            self.enters += 1;
            probe.log.push("enter parked");
            Transition::Stay
        }

        fn update(&mut self, probe: &mut Probe, dock: &mut Dock, _dt: f32) -> Transition {
            dock.ticks += 1;
            if probe.fuel > 0 {
                Transition::to::<Cruising>()
            } else {
                Transition::Stay
            }
        }

        fn on_exit(&mut self, probe: &mut Probe, _dock: &mut Dock) {
            probe.log.push("exit parked");
        }
    }

    struct Cruising;

    impl State<Probe, Dock> for Cruising {
        fn on_enter(&mut self, probe: &mut Probe, _dock: &mut Dock) -> Transition {
            probe.log.push("enter cruising");
            Transition::Stay
        }

        fn update(&mut self, probe: &mut Probe, _dock: &mut Dock, _dt: f32) -> Transition {
            probe.fuel -= 1;
            if probe.fuel == 0 {
                Transition::to::<Parked>()
            } else {
                Transition::Stay
            }
        }
    }

    /// Enter hook that bounces straight into `PingB`.
    struct PingA;
    /// Enter hook that bounces straight back into `PingA`.
    struct PingB;

    impl State<Probe, Dock> for PingA {
        fn on_enter(&mut self, _probe: &mut Probe, _dock: &mut Dock) -> Transition {
            Transition::to::<PingB>()
        }
        fn update(&mut self, _probe: &mut Probe, _dock: &mut Dock, _dt: f32) -> Transition {
            Transition::Stay
        }
    }

    impl State<Probe, Dock> for PingB {
        fn on_enter(&mut self, _probe: &mut Probe, _dock: &mut Dock) -> Transition {
            Transition::to::<PingA>()
        }
        fn update(&mut self, _probe: &mut Probe, _dock: &mut Dock, _dt: f32) -> Transition {
            Transition::Stay
        }
    }

    fn machine() -> StateMachine<Probe, Dock> {
        let mut fsm = StateMachine::new();
        fsm.register_state(Parked::default()).unwrap();
        fsm.register_state(Cruising).unwrap();
        fsm
    }

    #[test]
    fn test_start_runs_enter_once() {
        let mut fsm = machine();
        let mut probe = Probe::default();
        let mut dock = Dock::default();

        assert!(fsm.current().is_none());
        fsm.start::<Parked>(&mut probe, &mut dock).unwrap();

        assert!(fsm.is_in::<Parked>());
        assert_eq!(fsm.state::<Parked>().unwrap().enters, 1);
        assert_eq!(probe.log, vec!["enter parked"]);
        assert_eq!(fsm.transition_count(), 1);
    }

    #[test]
    fn test_update_before_start_fails() {
        let mut fsm = machine();
        let err = fsm
            .update(&mut Probe::default(), &mut Dock::default(), 0.016)
            .unwrap_err();
        assert_eq!(err, FsmError::NotStarted);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut fsm = machine();
        assert_eq!(
            fsm.register_state(Cruising).unwrap_err(),
            FsmError::DuplicateState("Cruising")
        );
        assert_eq!(fsm.state_count(), 2);
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let mut fsm = machine();
        let mut probe = Probe::default();
        let mut dock = Dock::default();

        assert_eq!(
            fsm.start::<PingA>(&mut probe, &mut dock).unwrap_err(),
            FsmError::UnknownState("PingA")
        );
        assert!(fsm.state::<PingA>().is_err());
        assert!(fsm.current().is_none());
    }

    #[test]
    fn test_exit_runs_before_enter() {
        let mut fsm = machine();
        let mut probe = Probe {
            fuel: 2,
            ..Probe::default()
        };
        let mut dock = Dock::default();

        fsm.start::<Parked>(&mut probe, &mut dock).unwrap();
        fsm.update(&mut probe, &mut dock, 0.016).unwrap();

        assert!(fsm.is_in::<Cruising>());
        assert_eq!(probe.log, vec!["enter parked", "exit parked", "enter cruising"]);

        // Two ticks of cruising burn the fuel and park again
        fsm.update(&mut probe, &mut dock, 0.016).unwrap();
        assert!(fsm.is_in::<Cruising>());
        fsm.update(&mut probe, &mut dock, 0.016).unwrap();
        assert!(fsm.is_in::<Parked>());
        assert_eq!(fsm.state::<Parked>().unwrap().enters, 2);
        assert_eq!(dock.ticks, 1);
    }

    #[test]
    fn test_state_mut_configures_without_activating() {
        let mut fsm = machine();
        fsm.state_mut::<Parked>().unwrap().enters = 10;
        assert!(fsm.current().is_none());
        assert_eq!(fsm.state::<Parked>().unwrap().enters, 10);
    }

    #[test]
    fn test_restart_is_a_normal_transition() {
        let mut fsm = machine();
        let mut probe = Probe::default();
        let mut dock = Dock::default();

        fsm.start::<Parked>(&mut probe, &mut dock).unwrap();
        fsm.start::<Cruising>(&mut probe, &mut dock).unwrap();
        assert_eq!(probe.log, vec!["enter parked", "exit parked", "enter cruising"]);
        assert_eq!(fsm.current_state_name(), Some("Cruising"));
    }

    #[test]
    fn test_enter_chain_is_bounded() {
        let mut fsm: StateMachine<Probe, Dock> = StateMachine::new();
        fsm.register_state(PingA).unwrap();
        fsm.register_state(PingB).unwrap();

        let err = fsm
            .start::<PingA>(&mut Probe::default(), &mut Dock::default())
            .unwrap_err();
        assert!(matches!(err, FsmError::TransitionLoop { limit: 2, .. }));
    }
}
