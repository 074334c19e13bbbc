//! Player entity spawning.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::brain::PlayerBrain;
use super::tuning::PlayerTuning;
use crate::actor::Intent;
use crate::animation::ClipPlayer;
use crate::fx::Tint;
use crate::physics::BodyShape;
use crate::world::ArenaEntity;

const PLAYER_COLOR: Color = Color::srgb(0.85, 0.85, 0.95);

/// Spawn the player at `position` with every component the simulation needs.
pub fn spawn_player(commands: &mut Commands, position: Vec2, tuning: &PlayerTuning) -> Entity {
    let half = tuning.half_size();
    let mut brain = PlayerBrain::new(position, tuning.clone());
    brain.protect_on_spawn(tuning.respawn_protection);
    let entity = commands
        .spawn((
            Name::new("Player"),
            brain,
            Intent::default(),
            ClipPlayer::default(),
            Tint::new(PLAYER_COLOR),
            BodyShape { half_size: half },
            Sprite::from_color(PLAYER_COLOR, half * 2.0),
            Transform::from_translation(position.extend(1.0)),
            (
                RigidBody::Dynamic,
                Collider::cuboid(half.x, half.y),
                LockedAxes::ROTATION_LOCKED,
                Velocity::zero(),
                GravityScale(tuning.gravity_scale),
                Friction::coefficient(0.0),
            ),
            ArenaEntity,
        ))
        .id();

    info!("Spawned player at {:?}", position);
    entity
}
