//! Fire-and-forget requests states hand to the audio, VFX and combat layers.

use bevy::prelude::*;
use serde::Deserialize;

use super::world::Faction;

/// Sound table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SoundId {
    Jump,
    Dash,
    Attack,
    Hit,
    Counter,
    Throw,
    Catch,
    Cast,
    Stun,
    Death,
}

/// A projectile to spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub lifetime: f32,
    pub faction: Faction,
}

/// Side effect requested by a state. Nothing waits for it to finish.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Sound(SoundId),
    /// Brief white flash on being hit.
    Flash,
    /// Start or stop a repeating red blink.
    Blink(bool),
    /// Show or hide the "open to counter" cue.
    CounterCue(bool),
    PopupText(String),
    AfterImage,
    Dust,
    Projectile(ProjectileSpec),
    ThrowSword { direction: Vec2 },
    RecallSword,
    CastSkill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Regular damage.
    Strike,
    /// Parry attempt against a target with an open counter window.
    Counter,
}

/// Outgoing melee contact, resolved by the combat layer after the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: Entity,
    pub damage: f32,
    pub kind: HitKind,
}
