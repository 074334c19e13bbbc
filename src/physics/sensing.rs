//! Moves physics results into each actor's body and its commands back out.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::actor::{Brain, Target, TargetIndex};

/// Half extents of an actor's box collider, in pixels.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyShape {
    pub half_size: Vec2,
}

/// How far below the feet still counts as standing.
const GROUND_SKIN: f32 = 4.0;
/// How far past the leading edge a wall is detected.
const WALL_SKIN: f32 = 6.0;
/// How deep the ledge probe looks for ground ahead.
const LEDGE_DEPTH: f32 = 16.0;

/// Rebuild the target index from scratch each frame.
pub fn clear_targets(mut index: ResMut<TargetIndex>) {
    index.clear();
}

pub fn index_targets<B: Brain>(mut index: ResMut<TargetIndex>, query: Query<(Entity, &B, &BodyShape)>) {
    for (entity, brain, shape) in query.iter() {
        let actor = brain.actor();
        index.insert(Target {
            entity,
            position: actor.body.position,
            radius: shape.half_size.x,
            faction: brain.faction(),
            alive: !actor.is_dead(),
            counter_open: brain.counter_open(),
        });
    }
}

/// Refresh position, velocity and the ground / wall / ledge probes.
pub fn sample_bodies<B: Brain>(
    rapier_context: Query<&RapierContext>,
    mut query: Query<(&Transform, &Velocity, &BodyShape, &mut B)>,
) {
    let context = rapier_context.get_single().ok();

    for (transform, velocity, shape, mut brain) in query.iter_mut() {
        let facing = brain.actor().facing();
        let body = &mut brain.actor_mut().body;
        body.position = transform.translation.truncate();
        body.velocity = velocity.linvel;

        let Some(context) = context else {
            // Fallback: assume grounded if no physics context
            body.grounded = true;
            body.wall_ahead = false;
            body.ground_ahead = true;
            continue;
        };

        let half = shape.half_size;
        let feet = body.position - Vec2::Y * (half.y - 1.0);
        let solid = QueryFilter::only_fixed();

        body.grounded = context
            .cast_ray(feet, Vec2::NEG_Y, GROUND_SKIN + 1.0, true, solid)
            .is_some();
        body.wall_ahead = context
            .cast_ray(body.position, Vec2::X * facing, half.x + WALL_SKIN, true, solid)
            .is_some();
        let edge = feet + Vec2::X * facing * (half.x + 2.0);
        body.ground_ahead = context
            .cast_ray(edge, Vec2::NEG_Y, LEDGE_DEPTH, true, solid)
            .is_some();
    }
}

/// Write velocity, gravity and collider commands for the next physics step.
pub fn apply_bodies<B: Brain>(
    mut commands: Commands,
    mut query: Query<(
        Entity,
        &B,
        &mut Velocity,
        &mut GravityScale,
        &mut Sprite,
        Has<ColliderDisabled>,
    )>,
) {
    for (entity, brain, mut velocity, mut gravity, mut sprite, disabled) in query.iter_mut() {
        let actor = brain.actor();
        velocity.linvel = actor.body.velocity;
        gravity.0 = actor.body.gravity_scale();
        sprite.flip_x = actor.facing() < 0.0;

        if actor.body.collider_enabled && disabled {
            commands.entity(entity).remove::<ColliderDisabled>();
        } else if !actor.body.collider_enabled && !disabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}
