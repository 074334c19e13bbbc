//! rapier2d glue: the physics collaborator as the states see it.

mod plugin;
mod query;
mod sensing;

pub use plugin::PhysicsPlugin;
pub use query::{RapierWorld, WorldAccess};
pub use sensing::{apply_bodies, clear_targets, index_targets, sample_bodies, BodyShape};
