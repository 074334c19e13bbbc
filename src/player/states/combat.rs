//! Attack, counter, hurt and death states.

use bevy::prelude::*;

use super::{attack_point, neutral, strike_enemies, PlayerCtx, PlayerState};
use crate::actor::{Effect, Faction, Hit, HitKind, SoundId};
use crate::combat::ComboCounter;
use crate::fsm::{AnimationEvent, Scope, State};

/// Primary attack with a three-step combo.
///
/// Each step applies its own velocity from the movement table, replacing
/// whatever velocity the player had, and suspends gravity until the swing
/// ends.
#[derive(Debug)]
pub struct PrimaryAttackState {
    combo: ComboCounter,
    struck: Vec<Entity>,
}

impl Default for PrimaryAttackState {
    fn default() -> Self {
        Self::new(3, 2.0)
    }
}

impl PrimaryAttackState {
    pub fn new(steps: usize, window: f32) -> Self {
        Self {
            combo: ComboCounter::new(steps, window),
            struck: Vec::new(),
        }
    }

    pub fn combo(&self) -> &ComboCounter {
        &self.combo
    }
}

impl<'a> State<PlayerState, PlayerCtx<'a>> for PrimaryAttackState {
    fn enter(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        let index = self.combo.start(ctx.actor.now());
        self.struck.clear();

        let direction = match ctx.intent.move_sign() {
            d if d != 0.0 => d,
            _ => ctx.actor.facing(),
        };
        let step = ctx.tuning.attack_step(index);
        ctx.actor.set_velocity(step.x * direction, step.y);
        ctx.actor.face(direction);
        ctx.actor.body.suspend_gravity();
        scope.set_timer(ctx.tuning.attack_lunge_time);
        ctx.actor.emit(Effect::Sound(SoundId::Attack));
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if scope.timer_elapsed() {
            ctx.actor.set_zero_velocity();
        }
        if scope.trigger_called() {
            scope.change_state(neutral(ctx));
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.body.restore_gravity();
        ctx.actor.busy_for(ctx.tuning.attack_busy);
        self.combo.finish(ctx.actor.now());
    }

    fn on_animation_event(
        &mut self,
        event: AnimationEvent,
        _scope: &mut Scope<'_, PlayerState>,
        ctx: &mut PlayerCtx<'a>,
    ) {
        if event == AnimationEvent::AttackHit {
            let center = attack_point(ctx);
            let (radius, damage) = (ctx.tuning.attack_radius, ctx.tuning.attack_damage);
            strike_enemies(ctx, center, radius, damage, &mut self.struck);
        }
    }
}

/// Parry stance. Any enemy inside the attack circle with an open counter
/// window is countered, and the stance turns into the counter strike.
#[derive(Debug, Default)]
pub struct CounterState {
    succeeded: bool,
    countered: Vec<Entity>,
}

impl CounterState {
    /// Held long enough for the counter strike clip to finish it.
    const SUCCESS_HOLD: f32 = 10.0;

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }
}

impl<'a> State<PlayerState, PlayerCtx<'a>> for CounterState {
    fn enter(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        self.succeeded = false;
        self.countered.clear();
        scope.set_timer(ctx.tuning.counter_duration);
        ctx.actor.set_zero_velocity();
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.set_zero_velocity();

        let center = attack_point(ctx);
        for target in ctx.world.overlap_circle(center, ctx.tuning.attack_radius) {
            if target.faction != Faction::Enemy || !target.alive || !target.counter_open {
                continue;
            }
            if self.countered.contains(&target.entity) {
                continue;
            }
            self.countered.push(target.entity);
            ctx.actor.strike(Hit {
                target: target.entity,
                damage: ctx.tuning.counter_damage,
                kind: HitKind::Counter,
            });
            if !self.succeeded {
                self.succeeded = true;
                scope.set_timer(Self::SUCCESS_HOLD);
                ctx.actor.emit(Effect::Sound(SoundId::Counter));
            }
        }

        if scope.timer_elapsed() || scope.trigger_called() {
            scope.change_state(PlayerState::Idle);
        }
    }
}

/// Hit reaction. Takes control for a fixed time and carries the knockback
/// recorded when the damage landed.
#[derive(Debug, Default)]
pub struct HurtState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for HurtState {
    fn enter(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        scope.set_timer(ctx.tuning.hurt_duration);
        ctx.actor.hold_busy(true);
        ctx.actor.body.suspend_gravity();
        if let Some(knockback) = ctx.actor.take_knockback() {
            ctx.actor.force_velocity(knockback.velocity());
        }
        ctx.actor.emit(Effect::Blink(true));
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, _ctx: &mut PlayerCtx<'a>) {
        // Ground contact is not required, so a hit in the air cannot lock
        // the player in this state.
        if scope.timer_elapsed() {
            scope.change_state(PlayerState::Idle);
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.hold_busy(false);
        ctx.actor.body.restore_gravity();
        ctx.actor.emit(Effect::Blink(false));
    }
}

/// Terminal. Never exited.
///
/// The collider goes away with the body, so gravity is held off and the
/// corpse stays where it fell until it despawns.
#[derive(Debug, Default)]
pub struct DeadState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for DeadState {
    fn enter(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.hold_busy(true);
        ctx.actor.body.collider_enabled = false;
        ctx.actor.body.suspend_gravity();
        ctx.actor.force_velocity(Vec2::ZERO);
        ctx.actor.schedule_despawn(ctx.tuning.despawn_delay);
        ctx.actor.emit(Effect::Sound(SoundId::Death));
        ctx.actor.emit(Effect::Blink(false));
    }

    fn update(&mut self, _scope: &mut Scope<'_, PlayerState>, _ctx: &mut PlayerCtx<'a>) {}
}
