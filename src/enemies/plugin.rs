//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::brain::EnemyBrain;
use super::data::{load_enemy_definitions, EnemyRegistry};
use crate::actor::tick_brains;
use crate::core::SimSet;

/// Enemy plugin - loads archetypes and drives every enemy's state machine.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EnemyRegistry>()
            .add_systems(Startup, load_enemy_definitions)
            .add_systems(Update, tick_brains::<EnemyBrain>.in_set(SimSet::Think));
    }
}
