//! Fx plugin - sounds, sprite feedback and projectiles.

use bevy::prelude::*;

use super::audio::{load_sfx, SfxLibrary};
use super::feedback::{animate_floating_text, fade_out, update_tints};
use super::projectile::{fly_swords, move_projectiles, spawn_projectiles};
use super::systems::drain_effects;
use crate::core::{GameState, SimSet};
use crate::enemies::EnemyBrain;
use crate::player::PlayerBrain;

pub struct FxPlugin;

impl Plugin for FxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SfxLibrary>()
            .add_systems(Startup, load_sfx)
            // Projectiles deal damage before this frame's hits are resolved.
            .add_systems(Update, (move_projectiles, fly_swords).in_set(SimSet::Think))
            .add_systems(
                Update,
                (
                    (drain_effects::<PlayerBrain>, drain_effects::<EnemyBrain>),
                    spawn_projectiles,
                )
                    .chain()
                    .in_set(SimSet::Act),
            )
            .add_systems(
                Update,
                (update_tints, animate_floating_text, fade_out).run_if(in_state(GameState::InGame)),
            );
    }
}
