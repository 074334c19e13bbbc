//! State-machine kernel shared by every actor.
//!
//! The kernel knows nothing about players, enemies or Bevy. An actor owns a
//! [`StateMachine`] over its own key enum and state set, and drives it once
//! per simulation tick with a context type of its choosing.

mod error;
mod event;
mod machine;
mod timer;

pub use error::StateMachineError;
pub use event::AnimationEvent;
pub use machine::{InvalidTargetPolicy, Phase, Scope, State, StateKey, StateMachine, StateSet};
pub use timer::StateCore;
