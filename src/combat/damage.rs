//! The damage entry point shared by every actor.

use bevy::prelude::*;
use serde::Deserialize;

use super::components::KnockbackRequest;
use crate::actor::{Actor, Effect, SoundId};

/// A hit arriving at an actor's damage entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomingHit {
    pub amount: f32,
    pub attacker: Option<Entity>,
    /// Where the attacker stood when the hit landed. Drives knockback.
    pub attacker_position: Option<Vec2>,
}

impl IncomingHit {
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            attacker: None,
            attacker_position: None,
        }
    }

    pub fn with_attacker(mut self, attacker: Entity, position: Vec2) -> Self {
        self.attacker = Some(attacker);
        self.attacker_position = Some(position);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Invincible,
    AlreadyDead,
}

/// What a hit did to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Dropped entirely. No health change and no state change.
    Ignored(IgnoreReason),
    Damaged {
        dealt: f32,
        knockback: KnockbackRequest,
    },
    Killed {
        dealt: f32,
    },
}

impl DamageOutcome {
    pub fn landed(&self) -> bool {
        !matches!(self, DamageOutcome::Ignored(_))
    }
}

/// How an entity type reacts to a hit that did not kill it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum HitReaction {
    /// Hand control to the hurt state.
    #[default]
    Hurt,
    /// Keep the current state. Flash and take a short knockback.
    Flinch,
}

/// Apply a hit to `actor`.
///
/// Does nothing to an invincible or dead actor. Otherwise removes health,
/// records knockback pointing away from the attacker and queues the hit
/// flash and damage pop-up. Choosing the follow-up state is left to the
/// caller.
pub fn resolve_hit(actor: &mut Actor, hit: &IncomingHit) -> DamageOutcome {
    if actor.is_dead() {
        return DamageOutcome::Ignored(IgnoreReason::AlreadyDead);
    }
    if actor.is_invincible() {
        return DamageOutcome::Ignored(IgnoreReason::Invincible);
    }

    let dealt = actor.health.take_damage(hit.amount);
    actor.emit(Effect::Flash);
    actor.emit(Effect::Sound(SoundId::Hit));
    actor.emit(Effect::PopupText(format!("{}", dealt.round() as i32)));

    if actor.is_dead() {
        return DamageOutcome::Killed { dealt };
    }

    // Without an attacker the actor is pushed backwards.
    let attacker_x = hit
        .attacker_position
        .map_or(actor.body.position.x + actor.facing(), |p| p.x);
    let knockback = KnockbackRequest::away_from(actor.body.position.x, attacker_x, actor.knockback_force);
    actor.record_knockback(knockback);

    DamageOutcome::Damaged { dealt, knockback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Body;
    use crate::combat::InvincibilitySource;

    fn actor_at(x: f32) -> Actor {
        Actor::new(Body::new(Vec2::new(x, 0.0), 1.0), 100.0, Vec2::new(300.0, 400.0))
    }

    #[test]
    fn invincible_actor_takes_nothing() {
        let mut actor = actor_at(0.0);
        actor.make_invincible(InvincibilitySource::Dash, true);
        let outcome = resolve_hit(&mut actor, &IncomingHit::new(50.0));

        assert_eq!(outcome, DamageOutcome::Ignored(IgnoreReason::Invincible));
        assert_eq!(actor.health.current, 100.0);
        assert!(actor.effects().is_empty());
        assert!(actor.take_knockback().is_none());
    }

    #[test]
    fn hit_records_knockback_away_from_attacker() {
        let mut actor = actor_at(0.0);
        let hit = IncomingHit::new(20.0).with_attacker(Entity::from_raw(3), Vec2::new(-40.0, 0.0));
        let outcome = resolve_hit(&mut actor, &hit);

        let DamageOutcome::Damaged { dealt, knockback } = outcome else {
            panic!("expected damage, got {outcome:?}");
        };
        assert_eq!(dealt, 20.0);
        assert_eq!(knockback.direction, 1.0);
        assert_eq!(actor.take_knockback(), Some(knockback));
        assert!(actor.effects().contains(&Effect::Flash));
        assert!(actor.effects().contains(&Effect::PopupText("20".to_string())));
    }

    #[test]
    fn hit_without_attacker_pushes_backwards() {
        let mut actor = actor_at(0.0);
        actor.face(-1.0);
        let DamageOutcome::Damaged { knockback, .. } = resolve_hit(&mut actor, &IncomingHit::new(5.0))
        else {
            panic!("expected damage");
        };
        assert_eq!(knockback.direction, 1.0);
    }

    #[test]
    fn lethal_hit_kills_once() {
        let mut actor = actor_at(0.0);
        assert_eq!(
            resolve_hit(&mut actor, &IncomingHit::new(150.0)),
            DamageOutcome::Killed { dealt: 100.0 }
        );
        assert_eq!(
            resolve_hit(&mut actor, &IncomingHit::new(10.0)),
            DamageOutcome::Ignored(IgnoreReason::AlreadyDead)
        );
    }
}
