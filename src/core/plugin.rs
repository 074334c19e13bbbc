//! Core plugin that sets up game states, events and the simulation order.

use bevy::prelude::*;

use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused, GameOver)
/// - Global events (DamageEvent, DeathEvent, AnimationSignal, ...)
/// - The chained `SimSet` order every gameplay system runs in
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_state::<GameState>()

            .add_event::<DamageEvent>()
            .add_event::<CounterEvent>()
            .add_event::<DeathEvent>()
            .add_event::<AnimationSignal>()
            .add_event::<SpawnRequest>()

            .configure_sets(
                Update,
                (
                    SimSet::Sense,
                    SimSet::Think,
                    SimSet::Animate,
                    SimSet::Resolve,
                    SimSet::Act,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )

            // Data files are read synchronously in Startup, so Loading only
            // lasts one frame.
            .add_systems(OnEnter(GameState::Loading), finish_loading)

            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused))),
            );
    }
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
