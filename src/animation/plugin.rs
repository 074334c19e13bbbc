//! Animation plugin - clip library loading and playback systems.

use bevy::prelude::*;

use super::clips::{load_clip_library, ClipLibrary};
use super::playback::{advance_clips, deliver_signals};
use crate::core::SimSet;
use crate::enemies::EnemyBrain;
use crate::player::PlayerBrain;

/// Plays the clip each state asks for and feeds markers back to it.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClipLibrary>()
            .add_systems(Startup, load_clip_library)
            .add_systems(
                Update,
                (
                    (advance_clips::<PlayerBrain>, advance_clips::<EnemyBrain>),
                    (deliver_signals::<PlayerBrain>, deliver_signals::<EnemyBrain>),
                )
                    .chain()
                    .in_set(SimSet::Animate),
            );
    }
}
