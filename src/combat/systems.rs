//! Combat systems - turning queued hits into damage, counters and deaths.

use bevy::prelude::*;

use super::damage::{DamageOutcome, IncomingHit};
use crate::actor::{Brain, Faction, HitKind};
use crate::core::{CounterEvent, DamageEvent, DeathEvent, GameState};
use crate::enemies::EnemyBrain;

/// Forward every melee hit a brain queued this frame as an event.
pub fn dispatch_hits<B: Brain>(
    mut query: Query<(Entity, &mut B)>,
    mut damage_events: EventWriter<DamageEvent>,
    mut counter_events: EventWriter<CounterEvent>,
) {
    for (entity, mut brain) in query.iter_mut() {
        let hits = brain.actor_mut().drain_hits();
        if hits.is_empty() {
            continue;
        }
        let position = brain.actor().body.position;

        for hit in hits {
            match hit.kind {
                HitKind::Strike => {
                    damage_events.send(DamageEvent {
                        target: hit.target,
                        source: Some(entity),
                        source_position: Some(position),
                        amount: hit.damage,
                    });
                }
                HitKind::Counter => {
                    counter_events.send(CounterEvent {
                        target: hit.target,
                        source: entity,
                        source_position: position,
                        amount: hit.damage,
                    });
                }
            }
        }
    }
}

/// Stun countered enemies, then deal the counter's damage.
pub fn apply_counters(
    mut counter_events: EventReader<CounterEvent>,
    mut enemies: Query<&mut EnemyBrain>,
    mut death_events: EventWriter<DeathEvent>,
) {
    for event in counter_events.read() {
        let Ok(mut brain) = enemies.get_mut(event.target) else {
            continue;
        };
        if !brain.try_stun(event.source_position.x) {
            debug!("Counter on {:?} missed the window", event.target);
            continue;
        }
        info!("{} countered", brain.definition().name);

        if event.amount <= 0.0 {
            continue;
        }
        let hit = IncomingHit::new(event.amount).with_attacker(event.source, event.source_position);
        if let DamageOutcome::Killed { .. } = brain.take_damage(&hit) {
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
        }
    }
}

/// Apply damage events addressed to brains of type `B`.
pub fn apply_damage<B: Brain>(
    mut damage_events: EventReader<DamageEvent>,
    mut query: Query<&mut B>,
    mut death_events: EventWriter<DeathEvent>,
) {
    for event in damage_events.read() {
        let Ok(mut brain) = query.get_mut(event.target) else {
            continue;
        };

        let mut hit = IncomingHit::new(event.amount);
        hit.attacker = event.source;
        hit.attacker_position = event.source_position;

        match brain.take_damage(&hit) {
            DamageOutcome::Killed { dealt } => {
                debug!("{:?} took {} and died", event.target, dealt);
                death_events.send(DeathEvent {
                    entity: event.target,
                    killed_by: event.source,
                });
            }
            DamageOutcome::Damaged { dealt, .. } => {
                debug!("{:?} took {} ({})", event.target, dealt, brain.state_name());
            }
            DamageOutcome::Ignored(reason) => {
                debug!("{:?} ignored a hit: {:?}", event.target, reason);
            }
        }
    }
}

/// Log deaths as they happen.
pub fn check_deaths(mut death_events: EventReader<DeathEvent>, names: Query<&Name>) {
    for event in death_events.read() {
        let name = names
            .get(event.entity)
            .map_or_else(|_| format!("{:?}", event.entity), |n| n.to_string());
        info!("{} died", name);
    }
}

/// Remove actors whose death delay has run out. Losing the player ends the
/// run.
pub fn despawn_finished<B: Brain>(
    mut commands: Commands,
    query: Query<(Entity, &B)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for (entity, brain) in query.iter() {
        if !brain.actor().despawn_due() {
            continue;
        }
        commands.entity(entity).despawn_recursive();
        if brain.faction() == Faction::Player {
            info!("Player died! Transitioning to Game Over...");
            next_state.set(GameState::GameOver);
        }
    }
}
