//! Combat plugin - damage, counters and death handling.

use bevy::prelude::*;

use super::systems::{apply_counters, apply_damage, check_deaths, despawn_finished, dispatch_hits};
use crate::core::SimSet;
use crate::enemies::EnemyBrain;
use crate::player::PlayerBrain;

/// Combat plugin - resolves hits after the animation markers have fired.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (dispatch_hits::<PlayerBrain>, dispatch_hits::<EnemyBrain>),
                apply_counters,
                (apply_damage::<PlayerBrain>, apply_damage::<EnemyBrain>),
                check_deaths,
            )
                .chain()
                .in_set(SimSet::Resolve),
        )
        .add_systems(
            Update,
            (despawn_finished::<PlayerBrain>, despawn_finished::<EnemyBrain>).in_set(SimSet::Act),
        );
    }
}
