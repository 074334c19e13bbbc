//! World module - the demo arena and its camera.

mod arena;
mod data;
mod plugin;

pub use arena::{build_arena, ArenaCamera, ArenaEntity};
pub use data::{ArenaLayout, ArenaLayoutRaw, EnemySpawn, SolidBlock};
pub use plugin::{clear_arena, setup_arena, WorldPlugin};
