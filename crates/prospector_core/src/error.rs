//! # Core Error Types
//!
//! Every error here is a local contract violation. They are meant to be
//! caught during development; callers log them and trip a debug assertion
//! rather than recover.

use thiserror::Error;

/// Errors raised by [`crate::EntityPool`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A new entity was requested while every slot is in use.
    #[error("pool exhausted: all {capacity} slots are in use")]
    PoolExhausted {
        /// Fixed capacity of the pool.
        capacity: usize,
    },

    /// An index beyond the last active slot was accessed.
    #[error("index {index} out of range (last active index: {last_active:?})")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Highest occupied slot, `None` for an empty pool.
        last_active: Option<usize>,
    },
}

/// Errors raised by [`crate::StateMachine`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsmError {
    /// Transition or lookup targeted a state that was never registered.
    #[error("unknown state: {0}")]
    UnknownState(&'static str),

    /// The same concrete state type was registered twice.
    #[error("state already registered: {0}")]
    DuplicateState(&'static str),

    /// `update` was called before `start`.
    #[error("state machine updated before start")]
    NotStarted,

    /// Enter hooks kept requesting transitions past the registry size.
    #[error("transition chain entering {state} exceeded {limit} hops")]
    TransitionLoop {
        /// The state that would have been entered next.
        state: &'static str,
        /// Maximum chain length (number of registered states).
        limit: usize,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Result type for state machine operations.
pub type FsmResult<T> = Result<T, FsmError>;
