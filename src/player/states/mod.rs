//! The player's state set.
//!
//! States are flat. Behaviour several states share, such as the input checks
//! every grounded state runs, lives in plain functions here rather than in a
//! parent state.

mod combat;
mod locomotion;
mod skills;

use bevy::prelude::*;

use super::kit::PlayerKit;
use super::tuning::PlayerTuning;
use crate::actor::{Actor, Effect, Faction, Hit, HitKind, Intent, WorldQuery};
use crate::fsm::{Scope, State, StateSet};

pub use combat::{CounterState, DeadState, HurtState, PrimaryAttackState};
pub use locomotion::{AirState, DashState, IdleState, JumpState, MoveState, WallJumpState, WallSlideState};
pub use skills::{AimSwordState, CastState, CatchSwordState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Idle,
    Move,
    Jump,
    Air,
    WallSlide,
    WallJump,
    Dash,
    PrimaryAttack,
    Counter,
    AimSword,
    CatchSword,
    Cast,
    Hurt,
    Dead,
}

/// Everything a player state may read or write during one call.
pub struct PlayerCtx<'a> {
    pub actor: &'a mut Actor,
    pub kit: &'a mut PlayerKit,
    pub intent: &'a Intent,
    pub tuning: &'a PlayerTuning,
    pub world: &'a dyn WorldQuery,
}

/// One object per state, kept for the player's whole lifetime.
#[derive(Debug, Default)]
pub struct PlayerStates {
    pub idle: IdleState,
    pub moving: MoveState,
    pub jump: JumpState,
    pub air: AirState,
    pub wall_slide: WallSlideState,
    pub wall_jump: WallJumpState,
    pub dash: DashState,
    pub attack: PrimaryAttackState,
    pub counter: CounterState,
    pub aim_sword: AimSwordState,
    pub catch_sword: CatchSwordState,
    pub cast: CastState,
    pub hurt: HurtState,
    pub dead: DeadState,
}

impl PlayerStates {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            attack: PrimaryAttackState::new(tuning.combo_len(), tuning.combo_window),
            ..default()
        }
    }
}

impl<'a> StateSet<PlayerState, PlayerCtx<'a>> for PlayerStates {
    fn state_mut(&mut self, key: PlayerState) -> Option<&mut dyn State<PlayerState, PlayerCtx<'a>>> {
        let state: &mut dyn State<PlayerState, PlayerCtx<'a>> = match key {
            PlayerState::Idle => &mut self.idle,
            PlayerState::Move => &mut self.moving,
            PlayerState::Jump => &mut self.jump,
            PlayerState::Air => &mut self.air,
            PlayerState::WallSlide => &mut self.wall_slide,
            PlayerState::WallJump => &mut self.wall_jump,
            PlayerState::Dash => &mut self.dash,
            PlayerState::PrimaryAttack => &mut self.attack,
            PlayerState::Counter => &mut self.counter,
            PlayerState::AimSword => &mut self.aim_sword,
            PlayerState::CatchSword => &mut self.catch_sword,
            PlayerState::Cast => &mut self.cast,
            PlayerState::Hurt => &mut self.hurt,
            PlayerState::Dead => &mut self.dead,
        };
        Some(state)
    }

    fn is_terminal(&self, key: PlayerState) -> bool {
        key == PlayerState::Dead
    }
}

/// Grounded when standing, airborne otherwise.
fn neutral(ctx: &PlayerCtx) -> PlayerState {
    if ctx.actor.body.grounded {
        PlayerState::Idle
    } else {
        PlayerState::Air
    }
}

/// Start a dash if one is allowed right now.
///
/// Dashing needs the cooldown to have run out, no wall directly ahead, and,
/// when airborne, an unspent air dash.
fn try_dash(scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx) -> bool {
    if !ctx.intent.dash_pressed || ctx.actor.is_busy() {
        return false;
    }
    if ctx.kit.dash_cooldown > 0.0 || ctx.actor.body.wall_ahead {
        return false;
    }
    if !ctx.actor.body.grounded && ctx.kit.air_dashes_used >= ctx.tuning.max_air_dashes {
        return false;
    }
    scope.change_state(PlayerState::Dash);
    true
}

/// Checks shared by every grounded state, run before the state's own logic.
///
/// Returns true when a transition was requested.
fn grounded_actions(scope: &mut Scope<'_, PlayerState>, ctx: &mut PlayerCtx) -> bool {
    if !ctx.actor.body.grounded {
        scope.change_state(PlayerState::Air);
        return true;
    }
    if ctx.actor.is_busy() {
        return false;
    }

    let intent = ctx.intent;
    if intent.cast_pressed && ctx.kit.cast_cooldown <= 0.0 {
        scope.change_state(PlayerState::Cast);
    } else if intent.aim_held && ctx.kit.has_sword() {
        scope.change_state(PlayerState::AimSword);
    } else if intent.aim_held && ctx.kit.recall_sword() {
        ctx.actor.emit(Effect::RecallSword);
    } else if intent.counter_pressed {
        scope.change_state(PlayerState::Counter);
    } else if intent.attack_pressed {
        scope.change_state(PlayerState::PrimaryAttack);
    } else if intent.jump_pressed {
        scope.change_state(PlayerState::Jump);
    } else {
        try_dash(scope, ctx);
    }
    scope.is_leaving()
}

/// Horizontal steering while airborne.
fn air_steer(ctx: &mut PlayerCtx) {
    if ctx.intent.move_x != 0.0 {
        let vy = ctx.actor.velocity().y;
        let speed = ctx.tuning.move_speed * ctx.tuning.air_control;
        ctx.actor.set_velocity(ctx.intent.move_x * speed, vy);
    }
}

/// Centre of the player's melee circle.
fn attack_point(ctx: &PlayerCtx) -> Vec2 {
    ctx.actor.body.position + Vec2::X * ctx.actor.facing() * ctx.tuning.attack_reach
}

/// Queue hits on every live enemy inside a circle, once per entity.
///
/// `struck` carries the entities already hit this activation.
fn strike_enemies(
    ctx: &mut PlayerCtx,
    center: Vec2,
    radius: f32,
    damage: f32,
    struck: &mut Vec<Entity>,
) -> usize {
    let mut landed = 0;
    for target in ctx.world.overlap_circle(center, radius) {
        if target.faction != Faction::Enemy || !target.alive || struck.contains(&target.entity) {
            continue;
        }
        struck.push(target.entity);
        ctx.actor.strike(Hit {
            target: target.entity,
            damage,
            kind: HitKind::Strike,
        });
        landed += 1;
    }
    landed
}
