//! Projectile entities: enemy arrows and the player's thrown sword.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::feedback::Fade;
use crate::actor::{report_fsm_error, Brain, Effect, Faction, ProjectileSpec, TargetIndex, WorldQuery};
use crate::core::{DamageEvent, SpawnRequest};
use crate::player::{PlayerBrain, PlayerState, SwordStatus};
use crate::world::ArenaEntity;

const ARROW_SIZE: Vec2 = Vec2::new(22.0, 4.0);
const ARROW_RADIUS: f32 = 6.0;
const SWORD_SIZE: Vec2 = Vec2::new(26.0, 6.0);
const SWORD_RADIUS: f32 = 12.0;

/// Straight-flying damage dealer that dies on its first hit.
#[derive(Component, Debug)]
pub struct Projectile {
    pub owner: Entity,
    pub faction: Faction,
    pub velocity: Vec2,
    pub damage: f32,
    pub remaining: f32,
}

/// The player's sword while it is out of hand.
#[derive(Component, Debug)]
pub struct ThrownSword {
    pub owner: Entity,
    pub velocity: Vec2,
    /// Seconds of flight left before it sticks where it is.
    pub flight: f32,
    pub stuck: bool,
    pub returning: bool,
    /// Enemies already cut on the current leg.
    pub struck: Vec<Entity>,
}

/// Spawn the entities effects asked for this frame.
pub fn spawn_projectiles(
    mut commands: Commands,
    mut requests: EventReader<SpawnRequest>,
    mut players: Query<&mut PlayerBrain>,
) {
    for request in requests.read() {
        match &request.effect {
            Effect::Projectile(shot) => spawn_arrow(&mut commands, request.owner, shot),
            Effect::ThrowSword { direction } => {
                let Ok(mut brain) = players.get_mut(request.owner) else {
                    warn!("Sword thrown by {:?}, which has no player brain", request.owner);
                    continue;
                };
                let velocity = *direction * brain.tuning().sword_speed;
                let flight = brain.tuning().sword_flight_time;
                let entity = commands
                    .spawn((
                        Name::new("Thrown Sword"),
                        ThrownSword {
                            owner: request.owner,
                            velocity,
                            flight,
                            stuck: false,
                            returning: false,
                            struck: Vec::new(),
                        },
                        Sprite::from_color(Color::srgb(0.75, 0.8, 0.9), SWORD_SIZE),
                        Transform::from_translation(request.position.extend(2.0))
                            .with_rotation(Quat::from_rotation_z(velocity.to_angle())),
                        ArenaEntity,
                    ))
                    .id();
                brain.kit_mut().attach_sword(entity);
            }
            Effect::CastSkill => {
                let radius = players
                    .get(request.owner)
                    .map_or(200.0, |brain| brain.tuning().cast_radius);
                commands.spawn((
                    Sprite::from_color(Color::srgba(0.5, 0.6, 1.0, 0.35), Vec2::splat(radius * 2.0)),
                    Transform::from_translation(request.position.extend(0.3)),
                    Fade::new(0.5, 0.35),
                    ArenaEntity,
                ));
            }
            Effect::RecallSword => debug!("Sword recalled by {:?}", request.owner),
            _ => {}
        }
    }
}

fn spawn_arrow(commands: &mut Commands, owner: Entity, shot: &ProjectileSpec) {
    commands.spawn((
        Name::new("Arrow"),
        Projectile {
            owner,
            faction: shot.faction,
            velocity: shot.velocity,
            damage: shot.damage,
            remaining: shot.lifetime,
        },
        Sprite::from_color(Color::srgb(0.6, 0.45, 0.3), ARROW_SIZE),
        Transform::from_translation(shot.origin.extend(2.0))
            .with_rotation(Quat::from_rotation_z(shot.velocity.to_angle())),
        ArenaEntity,
    ));
}

/// Whether static geometry lies along `step` from `from`.
fn blocked(context: Option<&RapierContext>, from: Vec2, step: Vec2) -> bool {
    let (Some(context), Some(dir)) = (context, step.try_normalize()) else {
        return false;
    };
    context
        .cast_ray(from, dir, step.length(), true, QueryFilter::only_fixed())
        .is_some()
}

/// Live actors of the other side touching a circle.
fn opponents(index: &TargetIndex, faction: Faction, center: Vec2, radius: f32) -> impl Iterator<Item = Entity> {
    index
        .overlap_circle(center, radius)
        .into_iter()
        .filter(move |t| t.faction != faction && t.alive)
        .map(|t| t.entity)
}

pub fn move_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    index: Res<TargetIndex>,
    mut query: Query<(Entity, &mut Transform, &mut Projectile)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let dt = time.delta_secs();
    let context = rapier_context.get_single().ok();

    for (entity, mut transform, mut projectile) in query.iter_mut() {
        projectile.remaining -= dt;
        let position = transform.translation.truncate();
        let step = projectile.velocity * dt;
        if projectile.remaining <= 0.0 || blocked(context, position, step) {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let next = position + step;
        transform.translation = next.extend(transform.translation.z);

        if let Some(target) = opponents(&index, projectile.faction, next, ARROW_RADIUS).next() {
            damage_events.send(DamageEvent {
                target,
                source: Some(projectile.owner),
                source_position: Some(next),
                amount: projectile.damage,
            });
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Fly, stick, and return the thrown sword. Arrival hands the sword back
/// and forces the owner into the catch state.
pub fn fly_swords(
    mut commands: Commands,
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    index: Res<TargetIndex>,
    mut swords: Query<(Entity, &mut Transform, &mut ThrownSword)>,
    mut players: Query<&mut PlayerBrain>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let dt = time.delta_secs();
    let context = rapier_context.get_single().ok();

    for (entity, mut transform, mut sword) in swords.iter_mut() {
        let Ok(mut brain) = players.get_mut(sword.owner) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };

        let position = transform.translation.truncate();
        let returning = matches!(brain.kit().sword, SwordStatus::Returning { .. });
        if returning && !sword.returning {
            sword.returning = true;
            sword.struck.clear();
        }
        let step = if returning {
            let to_owner = brain.actor().body.position - position;
            if to_owner.length() <= brain.tuning().sword_catch_radius {
                commands.entity(entity).despawn_recursive();
                brain.kit_mut().sword_position = Some(position);
                if let Err(e) = brain.change_state(PlayerState::CatchSword) {
                    report_fsm_error("player", &e);
                }
                continue;
            }
            to_owner.normalize_or_zero() * brain.tuning().sword_return_speed * dt
        } else if sword.stuck {
            Vec2::ZERO
        } else {
            sword.flight -= dt;
            let step = sword.velocity * dt;
            if sword.flight <= 0.0 || blocked(context, position, step) {
                sword.stuck = true;
                Vec2::ZERO
            } else {
                step
            }
        };

        let next = position + step;
        transform.translation = next.extend(transform.translation.z);
        if step != Vec2::ZERO {
            transform.rotation = Quat::from_rotation_z(step.to_angle());
        }
        brain.kit_mut().sword_position = Some(next);

        if step == Vec2::ZERO {
            continue;
        }
        let damage = brain.tuning().sword_damage;
        let fresh: Vec<Entity> = opponents(&index, Faction::Player, next, SWORD_RADIUS)
            .filter(|target| !sword.struck.contains(target))
            .collect();
        for target in fresh {
            sword.struck.push(target);
            damage_events.send(DamageEvent {
                target,
                source: Some(sword.owner),
                source_position: Some(next),
                amount: damage,
            });
        }
    }
}
