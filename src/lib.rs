//! Swordfall - a 2D side-on action game built around a small state-machine kernel.
//!
//! Every actor owns a [`fsm::StateMachine`] over its own state set. The
//! kernel and the states are plain Rust and run without an `App`; the ECS
//! layer samples physics into each actor, ticks the brains, and carries their
//! requests back out.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, system ordering, data loading
//! - **Physics**: rapier2d sensing and body commands
//! - **Player**: Input, tuning and the player's state set
//! - **Enemies**: Archetypes and the shared enemy state set
//! - **Animation**: Clip timelines and their markers
//! - **Combat**: Hits, counters, damage and deaths
//! - **Fx**: Sounds, sprite feedback and projectiles
//! - **World**: The demo arena
//! - **UI**: HUD and overlays

pub mod actor;
pub mod animation;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod fsm;
pub mod fx;
pub mod physics;
pub mod player;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
///
/// Expects `RapierPhysicsPlugin` to be added by the caller, and bevy's own
/// audio plugin to be disabled in favour of kira.
pub struct SwordfallPlugin;

impl Plugin for SwordfallPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            .add_plugins(bevy_kira_audio::AudioPlugin)

            .add_plugins(physics::PhysicsPlugin)

            .add_plugins(player::PlayerPlugin)

            .add_plugins(enemies::EnemyPlugin)

            .add_plugins(animation::AnimationPlugin)

            .add_plugins(combat::CombatPlugin)

            .add_plugins(fx::FxPlugin)

            .add_plugins(world::WorldPlugin)

            .add_plugins(ui::UiPlugin);
    }
}
