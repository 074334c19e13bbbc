//! Global events used for cross-system communication.
//!
//! States never touch other entities directly. Hits, deaths and animation
//! markers travel between systems as events so each brain is only ever
//! borrowed by one system at a time.

use bevy::prelude::*;

use crate::actor::Effect;
use crate::fsm::AnimationEvent;

/// Sent when an entity should take damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage, if it still exists
    pub source: Option<Entity>,
    /// Where the source stood when the hit landed
    pub source_position: Option<Vec2>,
    pub amount: f32,
}

/// Sent when a counter attack reaches an attacker with an open window.
#[derive(Event, Debug, Clone, Copy)]
pub struct CounterEvent {
    pub target: Entity,
    pub source: Entity,
    pub source_position: Vec2,
    /// Damage dealt on top of the stun
    pub amount: f32,
}

/// Sent when an entity dies (health reaches 0).
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}

/// An animation marker reached by an entity's current clip.
#[derive(Event, Debug, Clone, Copy)]
pub struct AnimationSignal {
    pub entity: Entity,
    pub event: AnimationEvent,
}

/// An effect that spawns something into the world, forwarded from an
/// actor's outbox.
#[derive(Event, Debug, Clone)]
pub struct SpawnRequest {
    pub owner: Entity,
    pub position: Vec2,
    pub facing: f32,
    pub effect: Effect,
}
