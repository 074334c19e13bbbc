//! UI plugin - HUD plus the pause and game over overlays.

use bevy::prelude::*;

use super::hud;
use crate::core::GameState;
use crate::world::{clear_arena, ArenaEntity};

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVER: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app
            // Pause overlay
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(OnExit(GameState::Paused), cleanup_overlay::<PauseMenuUi>)

            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), cleanup_overlay::<GameOverUi>)

            .add_systems(
                Update,
                menu_input.run_if(in_state(GameState::Paused).or(in_state(GameState::GameOver))),
            );
    }
}

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

/// Marker for game over UI entities.
#[derive(Component)]
struct GameOverUi;

/// Marker for menu buttons.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum MenuButton {
    Resume,
    Retry,
    Quit,
}

/// Full-screen overlay with a title and a column of buttons.
fn spawn_overlay<M: Component>(
    commands: &mut Commands,
    marker: M,
    background: Color,
    title: &str,
    title_color: Color,
    buttons: &[(&str, MenuButton)],
) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(background),
            marker,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 56.0,
                    ..default()
                },
                TextColor(title_color),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            for (label, button) in buttons {
                spawn_menu_button(parent, label, *button);
            }
        });
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn setup_pause_menu(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        PauseMenuUi,
        Color::srgba(0.0, 0.0, 0.0, 0.7),
        "PAUSED",
        Color::srgb(0.8, 0.8, 0.85),
        &[("Resume", MenuButton::Resume), ("Retry", MenuButton::Retry)],
    );
}

fn setup_game_over(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        GameOverUi,
        Color::srgba(0.1, 0.0, 0.0, 0.85),
        "YOU DIED",
        Color::srgb(0.8, 0.2, 0.2),
        &[("Retry", MenuButton::Retry), ("Quit", MenuButton::Quit)],
    );
}

/// Handle overlay button interactions.
///
/// Retry tears the arena down so entering `InGame` builds a fresh one.
fn menu_input(
    mut commands: Commands,
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    arena_query: Query<Entity, With<ArenaEntity>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button {
                    MenuButton::Resume => next_state.set(GameState::InGame),
                    MenuButton::Retry => {
                        info!("Restarting the arena");
                        clear_arena(&mut commands, &arena_query);
                        next_state.set(GameState::InGame);
                    }
                    MenuButton::Quit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVER.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }
}

fn cleanup_overlay<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
