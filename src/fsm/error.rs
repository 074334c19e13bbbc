//! Errors reported by the state-machine kernel.

use thiserror::Error;

use super::machine::Phase;

/// Logical errors raised while driving a [`super::StateMachine`].
///
/// State keys are carried as their `Debug` text so the error type does not
/// depend on the key enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateMachineError {
    /// `tick`, `change_state` or an animation event arrived before `initialize`.
    #[error("state machine used before initialize")]
    NotInitialized,

    /// `initialize` was called a second time.
    #[error("state machine already initialized (current state {current})")]
    AlreadyInitialized { current: String },

    /// The current state is terminal and refuses every transition.
    #[error("{current} is terminal; transition to {requested} refused")]
    Terminal { current: String, requested: String },

    /// The state set has no state for the requested key.
    #[error("no state {requested} in this machine (fell back to {fallback:?})")]
    InvalidTarget {
        requested: String,
        fallback: Option<String>,
    },

    /// A transition was requested from enter, exit or an animation callback.
    #[error("change_state({requested}) requested during {phase}; use defer instead")]
    ReentrantTransition { phase: Phase, requested: String },
}
