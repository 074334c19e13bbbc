//! Sword throw, sword catch and cast states.

use bevy::prelude::*;

use super::{strike_enemies, PlayerCtx, PlayerState};
use crate::actor::{Effect, SoundId};
use crate::fsm::{Scope, State};
use crate::player::SwordStatus;

/// Holding the skill button: stand still and face the aim point. Releasing
/// throws the sword toward it.
#[derive(Debug, Default)]
pub struct AimSwordState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for AimSwordState {
    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.set_zero_velocity();

        let position = ctx.actor.body.position;
        if let Some(aim) = ctx.intent.aim_point {
            ctx.actor.face(aim.x - position.x);
        }

        if !ctx.intent.aim_held {
            let direction = ctx
                .intent
                .aim_point
                .map(|aim| aim - position)
                .and_then(|d| d.try_normalize())
                .unwrap_or(Vec2::X * ctx.actor.facing());
            ctx.kit.sword = SwordStatus::Thrown { entity: None };
            ctx.actor.emit(Effect::ThrowSword { direction });
            ctx.actor.emit(Effect::Sound(SoundId::Throw));
            scope.change_state(PlayerState::Idle);
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.busy_for(ctx.tuning.aim_busy);
    }
}

/// The returning sword reached the player. Entered from outside the state
/// set when the sword arrives.
#[derive(Debug, Default)]
pub struct CatchSwordState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for CatchSwordState {
    fn enter(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if let Some(sword) = ctx.kit.sword_position {
            ctx.actor.face(sword.x - ctx.actor.body.position.x);
        }
        ctx.kit.catch_sword();

        // Pushed back by the impact, facing the sword.
        let vy = ctx.actor.velocity().y;
        let push = ctx.tuning.sword_return_impact * -ctx.actor.facing();
        ctx.actor.force_velocity(Vec2::new(push, vy));
        ctx.actor.emit(Effect::Dust);
        ctx.actor.emit(Effect::Sound(SoundId::Catch));
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, _ctx: &mut PlayerCtx<'a>) {
        if scope.trigger_called() {
            scope.change_state(PlayerState::Idle);
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.busy_for(ctx.tuning.catch_busy);
    }
}

/// Rise with gravity off, hover, and release the cast once.
#[derive(Debug, Default)]
pub struct CastState {
    cast_done: bool,
    struck: Vec<Entity>,
}

impl CastState {
    /// Slow sink while hovering.
    const HOVER_DRIFT: f32 = -10.0;

    pub fn cast_done(&self) -> bool {
        self.cast_done
    }
}

impl<'a> State<PlayerState, PlayerCtx<'a>> for CastState {
    fn enter(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        self.cast_done = false;
        self.struck.clear();
        scope.set_timer(ctx.tuning.cast_rise_time);
        ctx.kit.cast_cooldown = ctx.tuning.cast_cooldown;
        ctx.actor.body.suspend_gravity();
        ctx.actor.emit(Effect::Sound(SoundId::Cast));
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if !scope.timer_elapsed() {
            ctx.actor.force_velocity(Vec2::new(0.0, ctx.tuning.cast_rise_speed));
            return;
        }

        ctx.actor.force_velocity(Vec2::new(0.0, Self::HOVER_DRIFT));
        if !self.cast_done {
            self.cast_done = true;
            let center = ctx.actor.body.position;
            let (radius, damage) = (ctx.tuning.cast_radius, ctx.tuning.cast_damage);
            strike_enemies(ctx, center, radius, damage, &mut self.struck);
            ctx.actor.emit(Effect::CastSkill);
        }

        let total = ctx.tuning.cast_rise_time + ctx.tuning.cast_hover_time;
        if scope.core().elapsed() >= total {
            scope.change_state(PlayerState::Air);
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.body.restore_gravity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Brain, EmptyWorld, Intent};
    use crate::combat::IncomingHit;
    use crate::player::{PlayerBrain, PlayerTuning};

    const DT: f32 = 1.0 / 60.0;

    fn grounded_player() -> PlayerBrain {
        let mut brain = PlayerBrain::new(Vec2::ZERO, PlayerTuning::default());
        brain.actor_mut().body.grounded = true;
        brain
    }

    #[test]
    fn releasing_aim_throws_toward_aim_point() {
        let mut brain = grounded_player();
        let aim = Intent {
            aim_held: true,
            aim_point: Some(Vec2::new(-100.0, 0.0)),
            ..default()
        };
        brain.set_intent(aim);
        brain.tick(DT, &EmptyWorld);
        assert_eq!(brain.current(), Some(PlayerState::AimSword));

        brain.tick(DT, &EmptyWorld);
        assert_eq!(brain.actor().facing(), -1.0);

        brain.set_intent(Intent { aim_point: aim.aim_point, ..default() });
        brain.tick(DT, &EmptyWorld);
        assert_eq!(brain.current(), Some(PlayerState::Idle));
        assert!(!brain.kit().has_sword());
        assert!(brain
            .actor()
            .effects()
            .contains(&Effect::ThrowSword { direction: Vec2::NEG_X }));
    }

    #[test]
    fn aiming_while_sword_is_out_recalls_it() {
        let mut brain = grounded_player();
        brain.kit_mut().sword = SwordStatus::Thrown { entity: None };
        brain.set_intent(Intent { aim_held: true, ..default() });
        brain.tick(DT, &EmptyWorld);

        assert_eq!(brain.current(), Some(PlayerState::Idle));
        assert!(brain.actor().effects().contains(&Effect::RecallSword));
        assert!(matches!(brain.kit().sword, SwordStatus::Returning { .. }));
    }

    #[test]
    fn catch_is_forced_from_outside_and_pushes_back() {
        let mut brain = grounded_player();
        brain.kit_mut().sword = SwordStatus::Returning { entity: None };
        brain.kit_mut().sword_position = Some(Vec2::new(40.0, 0.0));

        brain.change_state(PlayerState::CatchSword).unwrap();
        assert!(brain.kit().has_sword());
        assert_eq!(brain.actor().facing(), 1.0);
        assert_eq!(brain.actor().velocity().x, -brain.tuning().sword_return_impact);
    }

    #[test]
    fn cast_rises_hovers_then_falls_back_to_air() {
        let mut brain = grounded_player();
        brain.set_intent(Intent { cast_pressed: true, ..default() });
        brain.tick(DT, &EmptyWorld);
        assert_eq!(brain.current(), Some(PlayerState::Cast));

        brain.actor_mut().body.grounded = false;
        brain.set_intent(Intent::default());
        brain.tick(DT, &EmptyWorld);
        assert_eq!(brain.actor().velocity().y, brain.tuning().cast_rise_speed);

        for _ in 0..30 {
            brain.tick(DT, &EmptyWorld);
        }
        assert!(brain.states().cast.cast_done());
        assert!(brain.actor().effects().contains(&Effect::CastSkill));

        for _ in 0..60 {
            brain.tick(DT, &EmptyWorld);
        }
        assert_eq!(brain.current(), Some(PlayerState::Air));
        assert!(!brain.actor().body.gravity_suspended());
    }

    #[test]
    fn hit_during_cast_rise_gives_gravity_back() {
        let mut brain = grounded_player();
        brain.set_intent(Intent { cast_pressed: true, ..default() });
        brain.tick(DT, &EmptyWorld);
        brain.actor_mut().body.grounded = false;
        brain.set_intent(Intent::default());
        brain.tick(DT, &EmptyWorld);
        assert_eq!(brain.current(), Some(PlayerState::Cast));
        assert!(brain.actor().body.gravity_suspended());

        let hit = IncomingHit::new(10.0).with_attacker(Entity::from_raw(1), Vec2::new(-50.0, 0.0));
        brain.take_damage(&hit);
        assert_eq!(brain.current(), Some(PlayerState::Hurt));
        assert!(!brain.states().cast.cast_done());

        for _ in 0..30 {
            brain.tick(DT, &EmptyWorld);
        }
        assert_ne!(brain.current(), Some(PlayerState::Hurt));
        assert_ne!(brain.current(), Some(PlayerState::Cast));
        assert_eq!(brain.actor().body.gravity_scale(), brain.tuning().gravity_scale);
        assert!(!brain.actor().effects().contains(&Effect::CastSkill));
    }
}
