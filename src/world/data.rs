//! Arena layout data and RON loading.
//!
//! An arena is an ASCII grid read top row first. `#` is solid ground, `P`
//! marks the player start and any character listed in `monsters` spawns that
//! enemy archetype. Everything else is open air.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::load_or_default;

const SOLID: char = '#';
const PLAYER_START: char = 'P';

fn default_tile_size() -> f32 {
    32.0
}

/// Arena file as read from RON.
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaLayoutRaw {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default)]
    pub monsters: HashMap<char, String>,
    pub grid: Vec<String>,
}

impl Default for ArenaLayoutRaw {
    fn default() -> Self {
        let grid = [
            "#..............................#",
            "#..............................#",
            "#..............................#",
            "#.........######........####...#",
            "#..............................#",
            "#...####..............A........#",
            "#..............................#",
            "#.P..........S..........S......#",
            "################################",
        ];
        Self {
            name: "Training Ground".to_string(),
            tile_size: default_tile_size(),
            monsters: HashMap::from([('S', "skeleton".to_string()), ('A', "archer".to_string())]),
            grid: grid.iter().map(|row| row.to_string()).collect(),
        }
    }
}

/// One merged run of solid tiles, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBlock {
    pub center: Vec2,
    pub half_size: Vec2,
}

/// An enemy placement resolved from the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    pub enemy_type: String,
    pub position: Vec2,
}

/// Resolved arena: static blocks plus spawn points.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ArenaLayout {
    pub name: String,
    pub tile_size: f32,
    pub width: usize,
    pub height: usize,
    pub solids: Vec<SolidBlock>,
    pub player_start: Vec2,
    pub enemies: Vec<EnemySpawn>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        // The builtin grid always has a player start.
        Self::from_raw(ArenaLayoutRaw::default()).unwrap_or_else(|_| Self {
            name: String::new(),
            tile_size: default_tile_size(),
            width: 0,
            height: 0,
            solids: Vec::new(),
            player_start: Vec2::ZERO,
            enemies: Vec::new(),
        })
    }
}

impl ArenaLayout {
    /// Resolve a raw grid. Horizontal runs of `#` become one block each.
    pub fn from_raw(raw: ArenaLayoutRaw) -> Result<Self, String> {
        let height = raw.grid.len();
        let width = raw.grid.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(format!("Arena '{}' has an empty grid", raw.name));
        }
        if raw.tile_size <= 0.0 {
            return Err(format!("Arena '{}' has tile size {}", raw.name, raw.tile_size));
        }

        let tile = raw.tile_size;
        let to_world = |col: usize, row: usize| {
            Vec2::new(
                col as f32 * tile + tile / 2.0,
                (height - 1 - row) as f32 * tile + tile / 2.0,
            )
        };

        let mut solids = Vec::new();
        let mut enemies = Vec::new();
        let mut player_start = None;

        for (row, line) in raw.grid.iter().enumerate() {
            let mut run_start: Option<usize> = None;
            let chars: Vec<char> = line.chars().collect();
            for col in 0..=chars.len() {
                let c = chars.get(col).copied().unwrap_or('.');
                if c == SOLID {
                    run_start.get_or_insert(col);
                    continue;
                }
                if let Some(start) = run_start.take() {
                    let first = to_world(start, row);
                    let last = to_world(col - 1, row);
                    solids.push(SolidBlock {
                        center: (first + last) / 2.0,
                        half_size: Vec2::new((col - start) as f32 * tile / 2.0, tile / 2.0),
                    });
                }
                if c == PLAYER_START {
                    if player_start.is_some() {
                        warn!("Arena '{}' has more than one player start, keeping the first", raw.name);
                    } else {
                        player_start = Some(to_world(col, row));
                    }
                } else if let Some(enemy_type) = raw.monsters.get(&c) {
                    enemies.push(EnemySpawn {
                        enemy_type: enemy_type.clone(),
                        position: to_world(col, row),
                    });
                }
            }
        }

        let Some(player_start) = player_start else {
            return Err(format!("Arena '{}' has no player start", raw.name));
        };

        Ok(Self {
            name: raw.name,
            tile_size: tile,
            width,
            height,
            solids,
            player_start,
            enemies,
        })
    }

    /// Centre of the whole grid in world units.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size / 2.0
    }
}

/// Load the arena from `assets/data/arena.ron`, or the builtin one.
pub fn load_arena_layout(mut commands: Commands) {
    let raw: ArenaLayoutRaw = load_or_default("assets/data/arena.ron");
    let layout = match ArenaLayout::from_raw(raw) {
        Ok(layout) => layout,
        Err(e) => {
            error!("{}; using the builtin arena", e);
            ArenaLayout::default()
        }
    };
    info!(
        "Arena '{}': {} blocks, {} enemies",
        layout.name,
        layout.solids.len(),
        layout.enemies.len()
    );
    commands.insert_resource(layout);
}
