//! Enemy entity spawning.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::brain::EnemyBrain;
use super::data::EnemyRegistry;
use crate::animation::ClipPlayer;
use crate::fx::Tint;
use crate::physics::BodyShape;
use crate::world::ArenaEntity;

/// Spawn one enemy of `enemy_type` at `position`.
///
/// Returns `None` and logs when the registry has no such archetype.
pub fn spawn_enemy(
    commands: &mut Commands,
    registry: &EnemyRegistry,
    enemy_type: &str,
    position: Vec2,
) -> Option<Entity> {
    let Some(definition) = registry.get(enemy_type) else {
        warn!("Unknown enemy type '{}', skipping spawn at {:?}", enemy_type, position);
        return None;
    };

    let half = definition.half_size();
    let seed = rand::random::<u64>();
    let entity = commands
        .spawn((
            Name::new(definition.name.clone()),
            EnemyBrain::new(definition.clone(), position, seed),
            ClipPlayer::default(),
            Tint::new(definition.color()),
            BodyShape { half_size: half },
            Sprite::from_color(definition.color(), half * 2.0),
            Transform::from_translation(position.extend(0.5)),
            (
                RigidBody::Dynamic,
                Collider::cuboid(half.x, half.y),
                LockedAxes::ROTATION_LOCKED,
                Velocity::zero(),
                GravityScale(definition.gravity_scale),
                Friction::coefficient(0.0),
            ),
            ArenaEntity,
        ))
        .id();

    info!("Spawned {} at {:?}", definition.name, position);
    Some(entity)
}
