//! Combat module - health, invincibility, knockback, combos and damage.

mod components;
mod damage;
mod plugin;
mod systems;

pub use components::*;
pub use damage::{resolve_hit, DamageOutcome, HitReaction, IgnoreReason, IncomingHit};
pub use plugin::CombatPlugin;
