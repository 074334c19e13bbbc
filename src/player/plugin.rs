//! Player plugin - tuning, input and the player's tick.

use bevy::prelude::*;

use super::brain::PlayerBrain;
use super::input::{feed_intent, read_input};
use super::tuning::{load_player_tuning, PlayerTuning};
use crate::actor::tick_brains;
use crate::core::SimSet;

/// Player plugin - handles player input and drives the player's state machine.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerTuning>()
            .add_systems(Startup, load_player_tuning)
            .add_systems(Update, (read_input, feed_intent).chain().in_set(SimSet::Sense))
            .add_systems(Update, tick_brains::<PlayerBrain>.in_set(SimSet::Think));
    }
}
