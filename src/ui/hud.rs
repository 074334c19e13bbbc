//! In-game HUD - player health and state readout.

use bevy::prelude::*;

use crate::actor::Brain;
use crate::core::GameState;
use crate::player::PlayerBrain;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Text showing the player's current state and busy flag.
#[derive(Component)]
pub struct StateReadout;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (update_health_bar, update_state_readout).run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Top-left corner
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Start,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                StateReadout,
            ));
        });
}

/// Helper to spawn a labelled status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Readout line for a brain, e.g. `Attack (busy)`.
pub fn state_label<B: Brain>(brain: &B) -> String {
    if brain.is_busy() {
        format!("{} (busy)", brain.state_name())
    } else {
        brain.state_name()
    }
}

/// Update health bar based on player health.
fn update_health_bar(
    player_query: Query<&PlayerBrain>,
    mut bar_query: Query<&mut Node, With<HealthBar>>,
) {
    let Ok(brain) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(brain.actor().health.percentage() * 100.0);
}

fn update_state_readout(
    player_query: Query<&PlayerBrain>,
    mut text_query: Query<&mut Text, With<StateReadout>>,
) {
    let Ok(brain) = player_query.get_single() else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let label = state_label(brain);
    if text.0 != label {
        text.0 = label;
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerTuning;

    #[test]
    fn readout_names_state() {
        let mut brain = PlayerBrain::new(Vec2::ZERO, PlayerTuning::default());
        brain.actor_mut().hold_busy(false);
        assert_eq!(state_label(&brain), brain.state_name());

        brain.actor_mut().hold_busy(true);
        assert!(state_label(&brain).ends_with("(busy)"));
    }
}
