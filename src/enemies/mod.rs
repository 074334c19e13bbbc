//! Enemies module - archetypes, the shared enemy state set, and spawning.

mod ai;
mod brain;
mod components;
pub mod data;
mod plugin;
mod spawning;

pub use ai::{EnemyCtx, EnemyState, EnemyStates};
pub use brain::EnemyBrain;
pub use components::EnemyKit;
pub use data::{AttackKind, EnemyDefinition, EnemyRegistry, StunConfig};
pub use plugin::EnemyPlugin;
pub use spawning::spawn_enemy;
