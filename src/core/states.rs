//! Game state definitions that control the overall flow of the game.
//!
//! Brains only tick in `InGame`, so pausing freezes every state machine
//! mid-activation without running any `exit`.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - `InGame` is active play
/// - `Paused` freezes gameplay but keeps the world visible
/// - `GameOver` when the player's death animation has finished
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Player has died
    GameOver,
}

/// Per-frame simulation order while in game.
///
/// Physics sensing and the target index are refreshed before any brain
/// ticks. Hits requested this frame are resolved after every brain has run.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Input polling, physics sensing, target index.
    Sense,
    /// Brains tick their current state.
    Think,
    /// Clips advance and deliver their markers.
    Animate,
    /// Hits, counters, projectiles, deaths.
    Resolve,
    /// Body commands back to physics, effects, despawns.
    Act,
}
