//! The actor: everything a state machine reads and writes about its entity.

use bevy::prelude::*;

use super::body::Body;
use super::effects::{Effect, Hit};
use crate::combat::{Health, Invincibility, InvincibilitySource, KnockbackRequest};

/// Per-entity data shared by every state of one actor.
///
/// Owned exclusively by the entity's brain. Other entities reach it only
/// through the brain's damage entry point.
#[derive(Debug, Clone)]
pub struct Actor {
    pub body: Body,
    pub health: Health,
    pub invincibility: Invincibility,
    /// Magnitude applied when this actor is knocked back.
    pub knockback_force: Vec2,
    facing: f32,
    busy_held: bool,
    busy_timer: f32,
    knocked_timer: f32,
    pending_knockback: Option<KnockbackRequest>,
    clock: f32,
    despawn_in: Option<f32>,
    effects: Vec<Effect>,
    hits: Vec<Hit>,
}

impl Actor {
    pub fn new(body: Body, max_health: f32, knockback_force: Vec2) -> Self {
        Self {
            body,
            health: Health::new(max_health),
            invincibility: Invincibility::default(),
            knockback_force,
            facing: 1.0,
            busy_held: false,
            busy_timer: 0.0,
            knocked_timer: 0.0,
            pending_knockback: None,
            clock: 0.0,
            despawn_in: None,
            effects: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// Advance the actor's own timers. Runs once per tick before the states.
    pub fn advance(&mut self, dt: f32) {
        self.clock += dt;
        if self.busy_timer > 0.0 {
            self.busy_timer -= dt;
        }
        if self.knocked_timer > 0.0 {
            self.knocked_timer -= dt;
        }
        if let Some(remaining) = self.despawn_in.as_mut() {
            *remaining -= dt;
        }
    }

    /// Seconds this actor has been simulated.
    pub fn now(&self) -> f32 {
        self.clock
    }

    // --- Facing ---

    /// +1 when facing right, -1 when facing left.
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn flip(&mut self) {
        self.facing = -self.facing;
    }

    /// Turn toward the sign of `x`. Zero leaves facing unchanged.
    pub fn face(&mut self, x: f32) {
        if x > 0.0 && self.facing < 0.0 || x < 0.0 && self.facing > 0.0 {
            self.flip();
        }
    }

    // --- Velocity ---

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    /// State-driven velocity write. Ignored while knocked back; turns the
    /// actor toward the horizontal direction of travel.
    pub fn set_velocity(&mut self, x: f32, y: f32) {
        if self.is_knocked() {
            return;
        }
        self.body.velocity = Vec2::new(x, y);
        self.face(x);
    }

    pub fn set_zero_velocity(&mut self) {
        if self.is_knocked() {
            return;
        }
        self.body.velocity = Vec2::ZERO;
    }

    /// Overwrite velocity without touching facing or the knocked window.
    pub fn force_velocity(&mut self, velocity: Vec2) {
        self.body.velocity = velocity;
    }

    // --- Busy flag ---

    /// Input-driven transitions are suppressed while busy.
    pub fn is_busy(&self) -> bool {
        self.busy_held || self.busy_timer > 0.0
    }

    /// Hold busy until released. Used for the whole of a state.
    pub fn hold_busy(&mut self, held: bool) {
        self.busy_held = held;
    }

    /// Stay busy for a short window, e.g. right after an attack.
    pub fn busy_for(&mut self, seconds: f32) {
        self.busy_timer = self.busy_timer.max(seconds);
    }

    // --- Knockback ---

    pub fn is_knocked(&self) -> bool {
        self.knocked_timer > 0.0
    }

    /// Record knockback for the reacting state to consume.
    pub fn record_knockback(&mut self, request: KnockbackRequest) {
        self.pending_knockback = Some(request);
    }

    pub fn take_knockback(&mut self) -> Option<KnockbackRequest> {
        self.pending_knockback.take()
    }

    /// Apply a knockback impulse and ignore state velocity writes for
    /// `duration` seconds. The current state keeps running.
    pub fn knock_back(&mut self, request: KnockbackRequest, duration: f32) {
        self.pending_knockback = None;
        self.body.velocity = request.velocity();
        self.knocked_timer = duration;
    }

    // --- Invincibility ---

    pub fn make_invincible(&mut self, source: InvincibilitySource, on: bool) {
        self.invincibility.make_invincible(source, on);
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_active()
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    // --- Lifecycle ---

    pub fn schedule_despawn(&mut self, delay: f32) {
        self.despawn_in = Some(delay);
    }

    pub fn despawn_due(&self) -> bool {
        self.despawn_in.is_some_and(|remaining| remaining <= 0.0)
    }

    // --- Outboxes ---

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn strike(&mut self, hit: Hit) {
        self.hits.push(hit);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn drain_hits(&mut self) -> Vec<Hit> {
        std::mem::take(&mut self.hits)
    }
}
