//! Physics plugin - sensing before the brains think, commands after.

use bevy::prelude::*;

use super::sensing::{apply_bodies, clear_targets, index_targets, sample_bodies};
use crate::actor::TargetIndex;
use crate::core::SimSet;
use crate::enemies::EnemyBrain;
use crate::player::PlayerBrain;

/// Connects actor bodies to rapier.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetIndex>()
            .add_systems(
                Update,
                (
                    (sample_bodies::<PlayerBrain>, sample_bodies::<EnemyBrain>),
                    clear_targets,
                    (index_targets::<PlayerBrain>, index_targets::<EnemyBrain>),
                )
                    .chain()
                    .in_set(SimSet::Sense),
            )
            .add_systems(
                Update,
                (apply_bodies::<PlayerBrain>, apply_bodies::<EnemyBrain>).in_set(SimSet::Act),
            );
    }
}
