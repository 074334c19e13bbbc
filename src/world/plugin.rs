//! World plugin - arena loading, building and the camera.

use bevy::prelude::*;

use super::arena::{build_arena, ArenaCamera, ArenaEntity};
use super::data::{load_arena_layout, ArenaLayout};
use crate::actor::Brain;
use crate::core::GameState;
use crate::enemies::EnemyRegistry;
use crate::player::{PlayerBrain, PlayerTuning};

const CAMERA_FOLLOW_RATE: f32 = 5.0;

/// World plugin - handles arena loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaLayout>()
            .add_systems(Startup, (load_arena_layout, spawn_camera).chain())
            .add_systems(OnEnter(GameState::InGame), setup_arena)
            .add_systems(Update, follow_player.run_if(in_state(GameState::InGame)));
    }
}

fn spawn_camera(mut commands: Commands, layout: Res<ArenaLayout>) {
    commands.spawn((
        Camera2d,
        Transform::from_translation(layout.center().extend(100.0)),
        ArenaCamera,
    ));
}

/// Build the arena unless one is already standing.
///
/// Resuming from pause re-enters `InGame` too, and must not rebuild.
pub fn setup_arena(
    mut commands: Commands,
    layout: Res<ArenaLayout>,
    tuning: Res<PlayerTuning>,
    registry: Res<EnemyRegistry>,
    existing: Query<(), With<ArenaEntity>>,
) {
    if !existing.is_empty() {
        return;
    }
    build_arena(&mut commands, &layout, &tuning, &registry);
}

/// Despawn every entity of the current run.
pub fn clear_arena(commands: &mut Commands, query: &Query<Entity, With<ArenaEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn follow_player(
    time: Res<Time>,
    layout: Res<ArenaLayout>,
    players: Query<&PlayerBrain>,
    mut cameras: Query<&mut Transform, With<ArenaCamera>>,
) {
    let Ok(brain) = players.get_single() else {
        return;
    };
    let target_x = brain.actor().body.position.x;
    let blend = (CAMERA_FOLLOW_RATE * time.delta_secs()).min(1.0);
    for mut transform in cameras.iter_mut() {
        transform.translation.x += (target_x - transform.translation.x) * blend;
        transform.translation.y = layout.center().y;
    }
}
