//! State trait and transition requests.

use std::any::{Any, TypeId};

/// Identity of a registered state: its concrete type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    id: TypeId,
    name: &'static str,
}

impl StateKey {
    /// Returns the key for state type `S`.
    #[must_use]
    pub fn of<S: 'static>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: short_type_name::<S>(),
        }
    }

    /// Returns the type id backing this key.
    #[inline]
    #[must_use]
    pub const fn id(self) -> TypeId {
        self.id
    }

    /// Returns the unqualified type name, for logs and events.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

fn short_type_name<S>() -> &'static str {
    let full = std::any::type_name::<S>();
    full.rsplit("::").next().unwrap_or(full)
}

/// What a state asks the machine to do after a hook returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// Keep the current state active.
    Stay,
    /// Exit the current state and enter the given one.
    To(StateKey),
}

impl Transition {
    /// Requests a transition to state type `S`.
    pub fn to<S: 'static>() -> Self {
        Self::To(StateKey::of::<S>())
    }
}

/// Upcast helper so registered states can be downcast for configuration.
///
/// Implemented for every `'static` type; states never implement it by hand.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A behaviour state operating on entity data `E` inside world `W`.
///
/// Hooks receive the entity record and the world separately so a state can
/// mutate both without aliasing the state machine that owns it.
pub trait State<E, W>: AsAny {
    /// Runs once when the state becomes active.
    ///
    /// Returning [`Transition::To`] chains straight into another state.
    fn on_enter(&mut self, _entity: &mut E, _world: &mut W) -> Transition {
        Transition::Stay
    }

    /// Runs every tick while the state is active.
    fn update(&mut self, entity: &mut E, world: &mut W, dt: f32) -> Transition;

    /// Runs once when the state is left, before the next state's enter hook.
    fn on_exit(&mut self, _entity: &mut E, _world: &mut W) {}
}
