//! The player's brain: state machine, actor and skill bookkeeping.

use bevy::prelude::*;

use super::kit::PlayerKit;
use super::states::{PlayerCtx, PlayerState, PlayerStates};
use super::tuning::PlayerTuning;
use crate::actor::{report_fsm_error, Actor, Body, Brain, Effect, EmptyWorld, Faction, Intent, WorldQuery};
use crate::animation::ClipId;
use crate::combat::{resolve_hit, DamageOutcome, IncomingHit, InvincibilitySource};
use crate::fsm::{AnimationEvent, StateMachine, StateMachineError};

#[derive(Component)]
pub struct PlayerBrain {
    machine: StateMachine<PlayerState, PlayerStates>,
    actor: Actor,
    kit: PlayerKit,
    intent: Intent,
    tuning: PlayerTuning,
}

impl PlayerBrain {
    pub fn new(position: Vec2, tuning: PlayerTuning) -> Self {
        let actor = Actor::new(
            Body::new(position, tuning.gravity_scale),
            tuning.max_health,
            tuning.knockback(),
        );
        let mut brain = Self {
            machine: StateMachine::new(PlayerStates::new(&tuning)).with_neutral(PlayerState::Idle),
            actor,
            kit: PlayerKit::default(),
            intent: Intent::default(),
            tuning,
        };

        let mut ctx = PlayerCtx {
            actor: &mut brain.actor,
            kit: &mut brain.kit,
            intent: &brain.intent,
            tuning: &brain.tuning,
            world: &EmptyWorld,
        };
        if let Err(e) = brain.machine.initialize(PlayerState::Idle, &mut ctx) {
            report_fsm_error("player", &e);
        }
        brain
    }

    /// Intent for the next tick and any animation events after it.
    pub fn set_intent(&mut self, intent: Intent) {
        self.intent = intent;
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn current(&self) -> Option<PlayerState> {
        self.machine.current()
    }

    pub fn machine(&self) -> &StateMachine<PlayerState, PlayerStates> {
        &self.machine
    }

    pub fn states(&self) -> &PlayerStates {
        self.machine.states()
    }

    pub fn kit(&self) -> &PlayerKit {
        &self.kit
    }

    pub fn kit_mut(&mut self) -> &mut PlayerKit {
        &mut self.kit
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Shield a freshly spawned player for `seconds`. The window closes on
    /// its own in [`Brain::tick`].
    pub fn protect_on_spawn(&mut self, seconds: f32) {
        if seconds <= 0.0 || self.kit.respawn_guard > 0.0 {
            return;
        }
        self.kit.respawn_guard = seconds;
        self.actor.make_invincible(InvincibilitySource::Respawn, true);
        self.actor.emit(Effect::Blink(true));
    }

    fn wear_off_protection(&mut self, dt: f32) {
        if self.kit.respawn_guard <= 0.0 {
            return;
        }
        self.kit.respawn_guard -= dt;
        if self.kit.respawn_guard <= 0.0 {
            self.kit.respawn_guard = 0.0;
            self.actor.make_invincible(InvincibilitySource::Respawn, false);
            self.actor.emit(Effect::Blink(false));
        }
    }

    /// Force a transition from outside the state set, e.g. when the thrown
    /// sword arrives back.
    pub fn change_state(&mut self, next: PlayerState) -> Result<(), StateMachineError> {
        let mut ctx = PlayerCtx {
            actor: &mut self.actor,
            kit: &mut self.kit,
            intent: &self.intent,
            tuning: &self.tuning,
            world: &EmptyWorld,
        };
        self.machine.change_state(next, &mut ctx)
    }
}

impl Brain for PlayerBrain {
    fn actor(&self) -> &Actor {
        &self.actor
    }

    fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    fn faction(&self) -> Faction {
        Faction::Player
    }

    fn rig(&self) -> &str {
        "player"
    }

    fn tick(&mut self, dt: f32, world: &dyn WorldQuery) {
        self.actor.advance(dt);
        self.kit.advance(dt, self.actor.body.grounded);
        self.wear_off_protection(dt);

        let mut ctx = PlayerCtx {
            actor: &mut self.actor,
            kit: &mut self.kit,
            intent: &self.intent,
            tuning: &self.tuning,
            world,
        };
        if let Err(e) = self.machine.tick(dt, &mut ctx) {
            report_fsm_error("player", &e);
        }
    }

    fn take_damage(&mut self, hit: &IncomingHit) -> DamageOutcome {
        let outcome = resolve_hit(&mut self.actor, hit);
        let next = match outcome {
            DamageOutcome::Killed { .. } => PlayerState::Dead,
            DamageOutcome::Damaged { .. } => PlayerState::Hurt,
            DamageOutcome::Ignored(_) => return outcome,
        };
        if let Err(e) = self.change_state(next) {
            report_fsm_error("player", &e);
        }
        outcome
    }

    fn on_animation_event(&mut self, event: AnimationEvent, world: &dyn WorldQuery) {
        let mut ctx = PlayerCtx {
            actor: &mut self.actor,
            kit: &mut self.kit,
            intent: &self.intent,
            tuning: &self.tuning,
            world,
        };
        if let Err(e) = self.machine.on_animation_event(event, &mut ctx) {
            report_fsm_error("player", &e);
        }
    }

    fn clip(&self) -> Option<ClipId> {
        let states = self.machine.states();
        let clip = match self.machine.current()? {
            PlayerState::Idle => ClipId::Idle,
            PlayerState::Move => ClipId::Move,
            PlayerState::Jump => ClipId::Jump,
            PlayerState::Air => ClipId::Air,
            PlayerState::WallSlide => ClipId::WallSlide,
            PlayerState::WallJump => ClipId::WallJump,
            PlayerState::Dash => ClipId::Dash,
            PlayerState::PrimaryAttack => match states.attack.combo().current() {
                0 => ClipId::Attack1,
                1 => ClipId::Attack2,
                _ => ClipId::Attack3,
            },
            PlayerState::Counter if states.counter.succeeded() => ClipId::CounterSuccess,
            PlayerState::Counter => ClipId::Counter,
            PlayerState::AimSword => ClipId::AimSword,
            PlayerState::CatchSword => ClipId::CatchSword,
            PlayerState::Cast => ClipId::Cast,
            PlayerState::Hurt => ClipId::Hurt,
            PlayerState::Dead => ClipId::Dead,
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
}
