//! The per-entity data every state machine drives, and the collaborator
//! interfaces the states talk to.

mod body;
mod brain;
mod components;
mod effects;
mod intent;
mod systems;
mod world;

pub use body::Body;
pub use brain::{report_fsm_error, Brain};
pub use components::Actor;
pub use effects::{Effect, Hit, HitKind, ProjectileSpec, SoundId};
pub use intent::Intent;
pub use systems::tick_brains;
pub use world::{EmptyWorld, Faction, Target, TargetIndex, WorldQuery};
