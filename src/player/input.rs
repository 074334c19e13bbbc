//! Keyboard and mouse to [`Intent`].
//!
//! Controls:
//! - A/D or arrows: move, S/down: slide faster on walls
//! - Space: jump (hold for full height)
//! - Left shift: dash
//! - J or left mouse: attack
//! - K: counter
//! - Right mouse (hold): aim sword, release to throw, press again to recall
//! - R: cast

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::brain::PlayerBrain;
use crate::actor::Intent;

fn axis(keyboard: &ButtonInput<KeyCode>, negative: [KeyCode; 2], positive: [KeyCode; 2]) -> f32 {
    let mut value = 0.0;
    if keyboard.any_pressed(negative) {
        value -= 1.0;
    }
    if keyboard.any_pressed(positive) {
        value += 1.0;
    }
    value
}

/// Poll input devices once per frame into the player's intent.
pub fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut query: Query<&mut Intent, With<PlayerBrain>>,
) {
    let Ok(mut intent) = query.get_single_mut() else {
        return;
    };

    let aim_point = windows
        .get_single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor| {
            let (camera, transform) = cameras.get_single().ok()?;
            camera.viewport_to_world_2d(transform, cursor).ok()
        });

    *intent = Intent {
        move_x: axis(&keyboard, [KeyCode::KeyA, KeyCode::ArrowLeft], [KeyCode::KeyD, KeyCode::ArrowRight]),
        move_y: axis(&keyboard, [KeyCode::KeyS, KeyCode::ArrowDown], [KeyCode::KeyW, KeyCode::ArrowUp]),
        jump_pressed: keyboard.just_pressed(KeyCode::Space),
        jump_held: keyboard.pressed(KeyCode::Space),
        dash_pressed: keyboard.just_pressed(KeyCode::ShiftLeft),
        attack_pressed: keyboard.just_pressed(KeyCode::KeyJ) || mouse.just_pressed(MouseButton::Left),
        counter_pressed: keyboard.just_pressed(KeyCode::KeyK),
        aim_held: mouse.pressed(MouseButton::Right),
        cast_pressed: keyboard.just_pressed(KeyCode::KeyR),
        aim_point,
    };
}

/// Hand this frame's intent to the brain before it ticks.
pub fn feed_intent(mut query: Query<(&Intent, &mut PlayerBrain)>) {
    for (intent, mut brain) in query.iter_mut() {
        brain.set_intent(*intent);
    }
}
