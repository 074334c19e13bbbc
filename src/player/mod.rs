//! Player module - the player's state set, brain, tuning and input.

mod brain;
mod input;
mod kit;
mod plugin;
mod spawning;
mod states;
mod tuning;

pub use brain::PlayerBrain;
pub use kit::{PlayerKit, SwordStatus};
pub use plugin::PlayerPlugin;
pub use spawning::spawn_player;
pub use states::{PlayerCtx, PlayerState, PlayerStates};
pub use tuning::PlayerTuning;
