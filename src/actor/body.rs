//! Physics snapshot and command buffer for one actor.

use bevy::prelude::*;

/// What the physics collaborator reported this tick, plus the commands the
/// states issue back to it.
///
/// Sensor fields are refreshed before the state machine ticks. Velocity,
/// gravity scale and collider changes are written back after it, and take
/// effect on the next physics step.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Feet are touching static ground.
    pub grounded: bool,
    /// A wall is directly ahead in the facing direction.
    pub wall_ahead: bool,
    /// There is ground below the leading edge (false at a ledge).
    pub ground_ahead: bool,
    pub collider_enabled: bool,
    gravity_scale: f32,
    default_gravity: f32,
}

impl Body {
    pub fn new(position: Vec2, gravity_scale: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            wall_ahead: false,
            ground_ahead: true,
            collider_enabled: true,
            gravity_scale,
            default_gravity: gravity_scale,
        }
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn gravity_suspended(&self) -> bool {
        self.gravity_scale == 0.0
    }

    pub fn suspend_gravity(&mut self) {
        self.gravity_scale = 0.0;
    }

    pub fn restore_gravity(&mut self) {
        self.gravity_scale = self.default_gravity;
    }

    /// Scale the default gravity, e.g. for a heavier death fall.
    pub fn scale_gravity(&mut self, factor: f32) {
        self.gravity_scale = self.default_gravity * factor;
    }
}
