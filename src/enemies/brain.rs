//! The enemy's brain: archetype, state machine and attack pacing.

use bevy::prelude::*;

use super::ai::{EnemyCtx, EnemyState, EnemyStates};
use super::components::EnemyKit;
use super::data::EnemyDefinition;
use crate::actor::{report_fsm_error, Actor, Body, Brain, EmptyWorld, Effect, Faction, WorldQuery};
use crate::animation::ClipId;
use crate::combat::{resolve_hit, DamageOutcome, HitReaction, IncomingHit};
use crate::fsm::{AnimationEvent, StateMachine, StateMachineError};

#[derive(Component)]
pub struct EnemyBrain {
    machine: StateMachine<EnemyState, EnemyStates>,
    actor: Actor,
    kit: EnemyKit,
    definition: EnemyDefinition,
}

impl EnemyBrain {
    /// `seed` drives the idle jitter and cooldown rolls.
    pub fn new(definition: EnemyDefinition, position: Vec2, seed: u64) -> Self {
        let actor = Actor::new(
            Body::new(position, definition.gravity_scale),
            definition.max_health,
            definition.knockback(),
        );
        let mut brain = Self {
            machine: StateMachine::new(EnemyStates::new(&definition)).with_neutral(EnemyState::Idle),
            actor,
            kit: EnemyKit::new(seed),
            definition,
        };

        let mut ctx = EnemyCtx {
            actor: &mut brain.actor,
            kit: &mut brain.kit,
            definition: &brain.definition,
            world: &EmptyWorld,
        };
        if let Err(e) = brain.machine.initialize(EnemyState::Idle, &mut ctx) {
            report_fsm_error(&brain.definition.name, &e);
        }
        brain
    }

    pub fn current(&self) -> Option<EnemyState> {
        self.machine.current()
    }

    pub fn machine(&self) -> &StateMachine<EnemyState, EnemyStates> {
        &self.machine
    }

    pub fn definition(&self) -> &EnemyDefinition {
        &self.definition
    }

    pub fn kit(&self) -> &EnemyKit {
        &self.kit
    }

    pub fn change_state(&mut self, next: EnemyState) -> Result<(), StateMachineError> {
        let mut ctx = EnemyCtx {
            actor: &mut self.actor,
            kit: &mut self.kit,
            definition: &self.definition,
            world: &EmptyWorld,
        };
        self.machine.change_state(next, &mut ctx)
    }

    /// Stun in response to a counter from an attacker at `attacker_x`.
    ///
    /// Only succeeds while the counter window is open, and never for
    /// archetypes without a stun.
    pub fn try_stun(&mut self, attacker_x: f32) -> bool {
        if !self.kit.counter_open() || !self.definition.can_be_stunned() || self.actor.is_dead() {
            return false;
        }
        self.kit.set_counter_open(false);
        self.actor.emit(Effect::CounterCue(false));
        self.kit.stun_away_from(self.actor.body.position.x, attacker_x);
        self.enter(EnemyState::Stunned)
    }

    fn enter(&mut self, next: EnemyState) -> bool {
        match self.change_state(next) {
            Ok(()) => true,
            Err(e) => {
                report_fsm_error(&self.definition.name, &e);
                false
            }
        }
    }
}

impl Brain for EnemyBrain {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    fn faction(&self) -> Faction {
        Faction::Enemy
    }

    fn rig(&self) -> &str {
        &self.definition.rig
    }

    fn tick(&mut self, dt: f32, world: &dyn WorldQuery) {
        self.actor.advance(dt);

        let mut ctx = EnemyCtx {
            actor: &mut self.actor,
            kit: &mut self.kit,
            definition: &self.definition,
            world,
        };
        if let Err(e) = self.machine.tick(dt, &mut ctx) {
            report_fsm_error(&self.definition.name, &e);
        }
    }

    fn take_damage(&mut self, hit: &IncomingHit) -> DamageOutcome {
        let outcome = resolve_hit(&mut self.actor, hit);
        match outcome {
            DamageOutcome::Killed { .. } => {
                self.enter(EnemyState::Dead);
            }
            DamageOutcome::Damaged { knockback, .. } => {
                let stagger = self.definition.reaction == HitReaction::Hurt
                    && self.definition.can_be_stunned()
                    && self.current() != Some(EnemyState::Stunned);
                if stagger {
                    self.actor.take_knockback();
                    self.kit.set_stun_direction(knockback.direction);
                    self.enter(EnemyState::Stunned);
                } else if self.current() == Some(EnemyState::Stunned) {
                    // Already reeling from the stun impulse.
                    self.actor.take_knockback();
                } else {
                    self.actor.knock_back(knockback, self.definition.knockback_duration);
                }
            }
            DamageOutcome::Ignored(_) => {}
        }
        outcome
    }

    fn on_animation_event(&mut self, event: AnimationEvent, world: &dyn WorldQuery) {
        let mut ctx = EnemyCtx {
            actor: &mut self.actor,
            kit: &mut self.kit,
            definition: &self.definition,
            world,
        };
        if let Err(e) = self.machine.on_animation_event(event, &mut ctx) {
            report_fsm_error(&self.definition.name, &e);
        }
    }

    fn clip(&self) -> Option<ClipId> {
        let clip = match self.machine.current()? {
            EnemyState::Idle => ClipId::Idle,
            EnemyState::Move => ClipId::Move,
            EnemyState::Battle => ClipId::Battle,
            EnemyState::Attack => ClipId::Attack1,
            EnemyState::Stunned => ClipId::Stunned,
            EnemyState::Dead => ClipId::Dead,
        };
        Some(clip)
    }

    fn activation(&self) -> u64 {
        self.machine.activations()
    }

    fn state_name(&self) -> String {
        self.machine
            .current()
            .map_or_else(|| "-".to_string(), |state| format!("{state:?}"))
    }

    fn can_be_interrupted(&self) -> bool {
        !self.machine.is_terminal() && !self.actor.is_invincible()
    }

    fn counter_open(&self) -> bool {
        self.kit.counter_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::data::StunConfig;

    fn attacking(definition: EnemyDefinition) -> EnemyBrain {
        let mut brain = EnemyBrain::new(definition, Vec2::ZERO, 11);
        brain.change_state(EnemyState::Attack).unwrap();
        brain.on_animation_event(AnimationEvent::OpenCounterWindow, &EmptyWorld);
        brain
    }

    #[test]
    fn counter_inside_window_stuns_away_from_attacker() {
        let mut brain = attacking(EnemyDefinition::default());
        assert!(brain.counter_open());

        assert!(brain.try_stun(-30.0));
        assert_eq!(brain.current(), Some(EnemyState::Stunned));
        assert!(!brain.counter_open());
        assert_eq!(brain.actor().velocity(), Vec2::new(200.0, 300.0));
        assert!(brain.is_busy());
        assert!(brain.actor().effects().contains(&Effect::Blink(true)));
    }

    #[test]
    fn counter_outside_window_does_nothing() {
        let mut brain = EnemyBrain::new(EnemyDefinition::default(), Vec2::ZERO, 11);
        assert!(!brain.try_stun(-30.0));
        assert_eq!(brain.current(), Some(EnemyState::Idle));
    }

    #[test]
    fn archetype_without_stun_cannot_be_countered() {
        let mut brain = attacking(EnemyDefinition {
            stun: None,
            ..default()
        });
        assert!(!brain.counter_open());
        assert!(!brain.try_stun(-30.0));
        assert_eq!(brain.current(), Some(EnemyState::Attack));
    }

    #[test]
    fn stun_wears_off_into_idle() {
        let mut brain = attacking(EnemyDefinition::default());
        brain.try_stun(30.0);
        for _ in 0..70 {
            brain.tick(1.0 / 60.0, &EmptyWorld);
        }
        assert_eq!(brain.current(), Some(EnemyState::Idle));
        assert!(!brain.is_busy());
        assert!(brain.actor().effects().contains(&Effect::Blink(false)));
    }

    #[test]
    fn flinch_keeps_state_and_ignores_velocity_briefly() {
        let mut brain = attacking(EnemyDefinition::default());
        let hit = IncomingHit::new(10.0).with_attacker(Entity::from_raw(1), Vec2::new(-20.0, 0.0));
        let outcome = brain.take_damage(&hit);

        assert!(outcome.landed());
        assert_eq!(brain.current(), Some(EnemyState::Attack));
        assert!(brain.actor().is_knocked());
        assert_eq!(brain.actor().velocity(), Vec2::new(160.0, 120.0));
        assert!(brain.counter_open(), "a flinch does not cancel the swing");
    }

    #[test]
    fn hurt_reaction_staggers_into_stun() {
        let definition = EnemyDefinition {
            reaction: HitReaction::Hurt,
            stun: Some(StunConfig {
                duration: 0.5,
                direction: (100.0, 50.0),
            }),
            ..default()
        };
        let mut brain = EnemyBrain::new(definition, Vec2::ZERO, 11);
        let hit = IncomingHit::new(10.0).with_attacker(Entity::from_raw(1), Vec2::new(20.0, 0.0));
        brain.take_damage(&hit);
        assert_eq!(brain.current(), Some(EnemyState::Stunned));
        assert_eq!(brain.actor().velocity(), Vec2::new(-100.0, 50.0));
    }

    #[test]
    fn death_disables_collider_and_schedules_despawn() {
        let mut brain = attacking(EnemyDefinition::default());
        brain.take_damage(&IncomingHit::new(1000.0));

        assert_eq!(brain.current(), Some(EnemyState::Dead));
        assert!(!brain.actor().body.collider_enabled);
        assert!(!brain.counter_open());
        assert_eq!(brain.actor().velocity(), Vec2::new(0.0, 350.0));
        assert_eq!(brain.actor().body.gravity_scale(), 4.5);

        brain.take_damage(&IncomingHit::new(10.0));
        assert!(!brain.try_stun(0.0));
        assert_eq!(brain.current(), Some(EnemyState::Dead));

        for _ in 0..130 {
            brain.tick(1.0 / 60.0, &EmptyWorld);
        }
        assert!(brain.actor().despawn_due());
    }
}
