//! Swordfall - Entry Point
//!
//! Controls:
//! - A/D or arrows: Move
//! - Space: Jump (hold for full height)
//! - Shift: Dash
//! - J / left click: Attack
//! - K: Counter
//! - Right mouse (hold): Aim sword, release to throw, press again to recall
//! - R: Cast
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins; kira replaces bevy's audio
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Swordfall".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::audio::AudioPlugin>(),
        )

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0))

        // Our game plugin
        .add_plugins(swordfall::SwordfallPlugin)

        .run();
}
