//! Idle, move, jump, air, wall and dash states.

use bevy::prelude::*;

use super::{air_steer, grounded_actions, neutral, try_dash, PlayerCtx, PlayerState};
use crate::actor::{Effect, SoundId};
use crate::combat::InvincibilitySource;
use crate::fsm::{Scope, State};

#[derive(Debug, Default)]
pub struct IdleState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for IdleState {
    fn enter(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        ctx.actor.set_zero_velocity();
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if grounded_actions(scope, ctx) {
            return;
        }

        let direction = ctx.intent.move_sign();
        // Pushing into a wall is not movement.
        if direction == ctx.actor.facing() && ctx.actor.body.wall_ahead {
            return;
        }
        if direction != 0.0 && !ctx.actor.is_busy() {
            scope.change_state(PlayerState::Move);
        }
    }
}

#[derive(Debug, Default)]
pub struct MoveState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for MoveState {
    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if grounded_actions(scope, ctx) {
            return;
        }

        let vy = ctx.actor.velocity().y;
        ctx.actor.set_velocity(ctx.intent.move_x * ctx.tuning.move_speed, vy);

        if ctx.intent.move_sign() == 0.0 || ctx.actor.body.wall_ahead {
            scope.change_state(PlayerState::Idle);
        }
    }
}

#[derive(Debug, Default)]
pub struct JumpState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for JumpState {
    fn enter(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        let vx = ctx.actor.velocity().x;
        ctx.actor.set_velocity(vx, ctx.tuning.jump_force);
        ctx.actor.emit(Effect::Sound(SoundId::Jump));
        ctx.actor.emit(Effect::Dust);
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        air_steer(ctx);

        let velocity = ctx.actor.velocity();
        if velocity.y <= 0.0 {
            scope.change_state(PlayerState::Air);
        } else if !ctx.intent.jump_held {
            ctx.actor.set_velocity(velocity.x, velocity.y * ctx.tuning.jump_cut);
            scope.change_state(PlayerState::Air);
        }
    }
}

#[derive(Debug, Default)]
pub struct AirState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for AirState {
    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        let body = &ctx.actor.body;
        if body.grounded && body.velocity.y <= 0.0 {
            scope.change_state(PlayerState::Idle);
            return;
        }
        if body.wall_ahead && body.velocity.y <= 0.0 {
            scope.change_state(PlayerState::WallSlide);
            return;
        }
        if try_dash(scope, ctx) {
            return;
        }
        air_steer(ctx);
    }
}

#[derive(Debug, Default)]
pub struct WallSlideState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for WallSlideState {
    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if ctx.intent.jump_pressed {
            scope.change_state(PlayerState::WallJump);
            return;
        }

        let direction = ctx.intent.move_sign();
        if direction != 0.0 && direction != ctx.actor.facing() {
            scope.change_state(PlayerState::Air);
            return;
        }
        if !ctx.actor.body.wall_ahead {
            scope.change_state(PlayerState::Air);
            return;
        }

        let vy = ctx.actor.velocity().y;
        if ctx.intent.move_y < 0.0 {
            ctx.actor.set_velocity(0.0, vy);
        } else {
            ctx.actor.set_velocity(0.0, vy * ctx.tuning.wall_slide_factor);
        }

        if ctx.actor.body.grounded {
            scope.change_state(PlayerState::Idle);
        }
    }
}

#[derive(Debug, Default)]
pub struct WallJumpState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for WallJumpState {
    fn enter(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        scope.set_timer(ctx.tuning.wall_jump_duration);
        let impulse = ctx.tuning.wall_jump();
        let away = -ctx.actor.facing();
        ctx.actor.set_velocity(impulse.x * away, impulse.y);
        ctx.actor.emit(Effect::Sound(SoundId::Jump));
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if scope.timer_elapsed() {
            scope.change_state(PlayerState::Air);
        } else if ctx.actor.body.grounded && ctx.actor.velocity().y <= 0.0 {
            scope.change_state(PlayerState::Idle);
        }
    }
}

#[derive(Debug, Default)]
pub struct DashState;

impl<'a> State<PlayerState, PlayerCtx<'a>> for DashState {
    fn enter(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        let direction = match ctx.intent.move_sign() {
            d if d != 0.0 => d,
            _ => ctx.actor.facing(),
        };
        ctx.kit.dash_direction = direction;
        ctx.kit.dash_cooldown = ctx.tuning.dash_cooldown;
        if !ctx.actor.body.grounded {
            ctx.kit.air_dashes_used += 1;
        }

        scope.set_timer(ctx.tuning.dash_duration);
        ctx.actor.make_invincible(InvincibilitySource::Dash, true);
        ctx.actor.body.suspend_gravity();
        ctx.actor.set_velocity(ctx.tuning.dash_speed * direction, 0.0);
        ctx.actor.emit(Effect::Sound(SoundId::Dash));
        ctx.actor.emit(Effect::AfterImage);
    }

    fn update(&mut self, scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        if !ctx.actor.body.grounded && ctx.actor.body.wall_ahead {
            scope.change_state(PlayerState::WallSlide);
            return;
        }

        ctx.actor
            .set_velocity(ctx.tuning.dash_speed * ctx.kit.dash_direction, 0.0);
        ctx.actor.emit(Effect::AfterImage);

        if scope.timer_elapsed() {
            scope.change_state(neutral(ctx));
        }
    }

    fn exit(&mut self, _scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx<'a>) {
        let vy = ctx.actor.velocity().y;
        ctx.actor.set_velocity(0.0, vy);
        ctx.actor.body.restore_gravity();
        ctx.actor.make_invincible(InvincibilitySource::Dash, false);
    }
}
