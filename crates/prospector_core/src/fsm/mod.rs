//! # Behaviour State Machines
//!
//! Every simulated unit owns one [`StateMachine`]. The machine holds a
//! registry of behaviour states keyed by their concrete type, and exactly
//! zero or one of them is active.
//!
//! ## Execution Model
//!
//! ```text
//! update(entity, world, dt)
//!   └─ active.update()  ──> Transition::Stay        -> return
//!                       └─> Transition::To(next)
//!                             ├─ active.on_exit()
//!                             ├─ active = next
//!                             └─ next.on_enter() ──> may chain (bounded)
//! ```
//!
//! There is no central transition table: each state decides its own
//! successor. Transitions are applied synchronously before `update`
//! returns.

mod machine;
mod state;

pub use machine::StateMachine;
pub use state::{AsAny, State, StateKey, Transition};
