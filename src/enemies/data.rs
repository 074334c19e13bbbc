//! Enemy archetype data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::combat::HitReaction;
use crate::core::load_ron;

/// How an archetype delivers its attack on the strike frame.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum AttackKind {
    /// Overlap a circle `reach` ahead of the body.
    Melee { radius: f32, reach: f32 },
    /// Release a projectile travelling along the facing direction.
    Ranged { projectile_speed: f32, lifetime: f32 },
}

/// Present only for archetypes that can be countered.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct StunConfig {
    pub duration: f32,
    /// Impulse applied away from the counter, x scaled by that direction.
    pub direction: (f32, f32),
}

/// Enemy archetype loaded from RON file.
///
/// Every archetype shares one state set; these numbers are all that tell a
/// skeleton from an archer.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: f32,
    pub damage: f32,
    pub move_speed: f32,
    pub battle_speed: f32,
    /// Line-of-sight distance along the facing direction.
    pub detection_range: f32,
    /// Distance at which the player is noticed from any side.
    pub aggro_radius: f32,
    pub give_up_distance: f32,
    pub attack_range: f32,
    /// Seconds between attacks, rolled anew after each attack.
    pub attack_cooldown: (f32, f32),
    pub idle_time: f32,
    pub idle_jitter: f32,
    /// Seconds the battle state persists without seeing the player.
    pub battle_time: f32,
    pub attack: AttackKind,
    pub stun: Option<StunConfig>,
    pub reaction: HitReaction,
    pub knockback_force: (f32, f32),
    pub knockback_duration: f32,
    pub death_pop: f32,
    pub death_gravity: f32,
    pub despawn_delay: f32,
    /// Horizontal bounds the patrol never leaves.
    pub patrol: Option<(f32, f32)>,
    pub size: (f32, f32),
    pub color: (f32, f32, f32),
    pub gravity_scale: f32,
    /// Clip set in the clip library.
    pub rig: String,
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        Self {
            name: "Skeleton".to_string(),
            max_health: 60.0,
            damage: 15.0,
            move_speed: 90.0,
            battle_speed: 160.0,
            detection_range: 260.0,
            aggro_radius: 90.0,
            give_up_distance: 420.0,
            attack_range: 55.0,
            attack_cooldown: (1.0, 2.0),
            idle_time: 1.5,
            idle_jitter: 0.5,
            battle_time: 4.0,
            attack: AttackKind::Melee {
                radius: 30.0,
                reach: 35.0,
            },
            stun: Some(StunConfig {
                duration: 1.0,
                direction: (200.0, 300.0),
            }),
            reaction: HitReaction::Flinch,
            knockback_force: (160.0, 120.0),
            knockback_duration: 0.12,
            death_pop: 350.0,
            death_gravity: 1.5,
            despawn_delay: 2.0,
            patrol: None,
            size: (32.0, 48.0),
            color: (0.8, 0.78, 0.7),
            gravity_scale: 3.0,
            rig: "enemy".to_string(),
        }
    }
}

impl EnemyDefinition {
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1) * 0.5
    }

    pub fn knockback(&self) -> Vec2 {
        Vec2::new(self.knockback_force.0, self.knockback_force.1)
    }

    pub fn color(&self) -> Color {
        Color::srgb(self.color.0, self.color.1, self.color.2)
    }

    pub fn can_be_stunned(&self) -> bool {
        self.stun.is_some()
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    pub fn insert(&mut self, enemy_type: impl Into<String>, definition: EnemyDefinition) {
        self.definitions.insert(enemy_type.into(), definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
///
/// Without any definitions on disk the compiled-in skeleton is registered so
/// the arena still has something to fight.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new("assets/data/enemies");
    read_definitions(enemies_dir, &mut registry);

    if registry.is_empty() {
        warn!("No enemy definitions loaded, using the built-in skeleton");
        registry.insert("skeleton", EnemyDefinition::default());
    }

    info!("Loaded {} enemy definitions", registry.len());
}

fn read_definitions(dir: &Path, registry: &mut EnemyRegistry) {
    if !dir.exists() {
        warn!("Enemy definitions directory not found: {:?}", dir);
        return;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        warn!("Failed to read enemy definitions directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        let Some(enemy_type) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        match load_ron::<EnemyDefinition>(&path) {
            Ok(definition) => {
                info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                registry.insert(enemy_type, definition);
            }
            Err(e) => error!("Failed to load enemy definition {:?}: {}", path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_ron;

    #[test]
    fn partial_definition_keeps_defaults() {
        let ron = r#"(
            name: "Archer",
            attack: Ranged(projectile_speed: 420.0, lifetime: 2.5),
            stun: None,
            attack_range: 300.0,
        )"#;
        let def: EnemyDefinition = parse_ron(ron, "archer.ron").unwrap();
        assert_eq!(def.name, "Archer");
        assert!(!def.can_be_stunned());
        assert_eq!(
            def.attack,
            AttackKind::Ranged {
                projectile_speed: 420.0,
                lifetime: 2.5
            }
        );
        assert_eq!(def.max_health, EnemyDefinition::default().max_health);
        assert_eq!(def.reaction, HitReaction::Flinch);
    }

    #[test]
    fn registry_lookup_by_type() {
        let mut registry = EnemyRegistry::default();
        registry.insert("skeleton", EnemyDefinition::default());
        assert!(registry.get("skeleton").is_some());
        assert!(registry.get("dragon").is_none());
        assert_eq!(registry.len(), 1);
    }
}
