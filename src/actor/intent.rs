//! Abstract player intent, polled once per tick.

use bevy::prelude::*;

/// Discrete intents produced by the input layer.
///
/// `*_pressed` fields are true only on the tick the button went down.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Horizontal axis in -1..=1.
    pub move_x: f32,
    /// Vertical axis in -1..=1. Negative is down.
    pub move_y: f32,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub dash_pressed: bool,
    pub attack_pressed: bool,
    pub counter_pressed: bool,
    pub aim_held: bool,
    pub cast_pressed: bool,
    /// World-space aim point for the thrown sword.
    pub aim_point: Option<Vec2>,
}

impl Intent {
    /// Horizontal axis snapped to -1, 0 or 1.
    pub fn move_sign(&self) -> f32 {
        if self.move_x > 0.0 {
            1.0
        } else if self.move_x < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}
