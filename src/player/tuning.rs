//! Player tunables, loaded from `assets/data/player.ron`.
//!
//! Distances are in pixels and times in seconds. Vectors are `(x, y)`
//! tuples so the RON file stays readable.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::load_or_default;

#[derive(Resource, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    /// Half extents of the player's box.
    pub size: (f32, f32),
    pub gravity_scale: f32,

    // Locomotion
    pub move_speed: f32,
    /// Fraction of `move_speed` available while airborne.
    pub air_control: f32,
    pub jump_force: f32,
    /// Vertical velocity kept when jump is released early.
    pub jump_cut: f32,
    /// Fall speed kept each tick while sliding down a wall.
    pub wall_slide_factor: f32,
    pub wall_jump_impulse: (f32, f32),
    pub wall_jump_duration: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub max_air_dashes: u32,

    // Primary attack
    /// Velocity applied at the start of each combo step.
    pub attack_movement: Vec<(f32, f32)>,
    /// How long the attack's velocity is held before stopping.
    pub attack_lunge_time: f32,
    pub combo_window: f32,
    pub attack_busy: f32,
    pub attack_damage: f32,
    pub attack_radius: f32,
    pub attack_reach: f32,

    // Counter
    pub counter_duration: f32,
    pub counter_damage: f32,

    // Sword skill
    pub sword_speed: f32,
    pub sword_return_speed: f32,
    pub sword_damage: f32,
    pub sword_flight_time: f32,
    pub sword_catch_radius: f32,
    pub sword_return_impact: f32,
    pub aim_busy: f32,
    pub catch_busy: f32,

    // Cast skill
    pub cast_rise_speed: f32,
    pub cast_rise_time: f32,
    pub cast_hover_time: f32,
    pub cast_radius: f32,
    pub cast_damage: f32,
    pub cast_cooldown: f32,

    // Hit reaction
    pub hurt_duration: f32,
    pub knockback_force: (f32, f32),
    pub despawn_delay: f32,
    /// Seconds of damage immunity after spawning.
    pub respawn_protection: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            size: (14.0, 24.0),
            gravity_scale: 3.0,

            move_speed: 320.0,
            air_control: 0.8,
            jump_force: 820.0,
            jump_cut: 0.5,
            wall_slide_factor: 0.7,
            wall_jump_impulse: (260.0, 820.0),
            wall_jump_duration: 0.4,
            dash_speed: 900.0,
            dash_duration: 0.2,
            dash_cooldown: 0.6,
            max_air_dashes: 1,

            attack_movement: vec![(120.0, 0.0), (160.0, 0.0), (300.0, 150.0)],
            attack_lunge_time: 0.1,
            combo_window: 2.0,
            attack_busy: 0.15,
            attack_damage: 20.0,
            attack_radius: 36.0,
            attack_reach: 28.0,

            counter_duration: 0.4,
            counter_damage: 30.0,

            sword_speed: 900.0,
            sword_return_speed: 1200.0,
            sword_damage: 15.0,
            sword_flight_time: 0.6,
            sword_catch_radius: 30.0,
            sword_return_impact: 300.0,
            aim_busy: 0.2,
            catch_busy: 0.1,

            cast_rise_speed: 400.0,
            cast_rise_time: 0.4,
            cast_hover_time: 1.0,
            cast_radius: 220.0,
            cast_damage: 25.0,
            cast_cooldown: 5.0,

            hurt_duration: 0.35,
            knockback_force: (300.0, 400.0),
            despawn_delay: 1.5,
            respawn_protection: 1.5,
        }
    }
}

impl PlayerTuning {
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1)
    }

    pub fn knockback(&self) -> Vec2 {
        Vec2::new(self.knockback_force.0, self.knockback_force.1)
    }

    pub fn wall_jump(&self) -> Vec2 {
        Vec2::new(self.wall_jump_impulse.0, self.wall_jump_impulse.1)
    }

    /// Combo steps in the movement table. Never zero.
    pub fn combo_len(&self) -> usize {
        self.attack_movement.len().max(1)
    }

    /// Movement for combo step `index`, or zero past the end of the table.
    pub fn attack_step(&self, index: usize) -> Vec2 {
        self.attack_movement
            .get(index)
            .map_or(Vec2::ZERO, |&(x, y)| Vec2::new(x, y))
    }
}

/// Load player tuning into its resource.
pub fn load_player_tuning(mut commands: Commands) {
    let tuning: PlayerTuning = load_or_default("assets/data/player.ron");
    commands.insert_resource(tuning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_ron;

    #[test]
    fn partial_file_keeps_defaults() {
        let tuning: PlayerTuning = parse_ron("(move_speed: 250.0, max_air_dashes: 2)", "inline").unwrap();
        assert_eq!(tuning.move_speed, 250.0);
        assert_eq!(tuning.max_air_dashes, 2);
        assert_eq!(tuning.combo_window, 2.0);
        assert_eq!(tuning.combo_len(), 3);
    }

    #[test]
    fn attack_step_past_table_is_zero() {
        let tuning = PlayerTuning::default();
        assert_eq!(tuning.attack_step(2), Vec2::new(300.0, 150.0));
        assert_eq!(tuning.attack_step(3), Vec2::ZERO);
    }
}
