//! # Ship Behaviour States
//!
//! Every ship runs one [`prospector_core::StateMachine`] over these states.
//! There is no transition table: each state picks its own successor.
//!
//! ```text
//!                 assign target
//!  PatrolFollowing ───────────> Traveling ──in reach──> Mining
//!        │                          │                     │
//!        │ owner gone       target lost          full or depleted
//!        ▼                          ▼                     ▼
//!      Idle <────────────────── (any) <──── Depositing <── Returning
//!        │                                      │
//!        └──────── target assigned ──> Traveling <┘ target still minable
//! ```
//!
//! Miners register all seven states. Escorts register only Idle, Following
//! and PatrolFollowing.
//!
//! A state that needs the mining target and finds it stale clears it and
//! falls back to Idle on that same update. The target is kept through
//! Returning and Depositing so the ship can go back for more.

mod depositing;
mod follow;
mod idle;
mod mining;
mod patrol;
mod returning;
mod travel;

pub use depositing::DepositingState;
pub use follow::FollowingState;
pub use idle::IdleState;
pub use mining::MiningState;
pub use patrol::PatrolFollowingState;
pub use returning::ReturningState;
pub use travel::TravelingState;

use prospector_core::Transition;

use crate::entities::ShipBody;

/// Drops the mining target and requests Idle.
fn abandon_target(body: &mut ShipBody) -> Transition {
    if let Some(handle) = body.mining_target.take() {
        tracing::debug!(ship = body.id.0, slot = handle.index(), "mining target lost");
    }
    Transition::to::<IdleState>()
}
