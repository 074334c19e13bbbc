//! Arena construction from a resolved layout.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::data::{ArenaLayout, SolidBlock};
use crate::enemies::{spawn_enemy, EnemyRegistry};
use crate::player::{spawn_player, PlayerTuning};

const GROUND_COLOR: Color = Color::srgb(0.22, 0.22, 0.28);

/// Marker for every entity that belongs to one run of the arena.
#[derive(Component)]
pub struct ArenaEntity;

/// The camera that tracks the player.
#[derive(Component)]
pub struct ArenaCamera;

/// Spawn the static blocks, the player and the enemies.
pub fn build_arena(
    commands: &mut Commands,
    layout: &ArenaLayout,
    tuning: &PlayerTuning,
    registry: &EnemyRegistry,
) {
    info!("Building arena: {}", layout.name);

    for block in &layout.solids {
        spawn_block(commands, block);
    }

    // Spawn points are tile centres; lift bodies so their feet start on the tile.
    let lift = |half_height: f32| Vec2::Y * (half_height - layout.tile_size / 2.0).max(0.0);

    spawn_player(commands, layout.player_start + lift(tuning.half_size().y), tuning);

    for spawn in &layout.enemies {
        let half_height = registry
            .get(&spawn.enemy_type)
            .map_or(0.0, |definition| definition.half_size().y);
        spawn_enemy(commands, registry, &spawn.enemy_type, spawn.position + lift(half_height));
    }
}

fn spawn_block(commands: &mut Commands, block: &SolidBlock) {
    commands.spawn((
        Name::new("Ground"),
        Sprite::from_color(GROUND_COLOR, block.half_size * 2.0),
        Transform::from_translation(block.center.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(block.half_size.x, block.half_size.y),
        Friction::coefficient(0.0),
        ArenaEntity,
    ));
}
