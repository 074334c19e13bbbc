//! World queries the states may run while they are current.

use std::collections::HashMap;

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Enemy,
}

/// Snapshot of another actor as seen from the querying one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub entity: Entity,
    pub position: Vec2,
    /// Half width of the target's body.
    pub radius: f32,
    pub faction: Faction,
    pub alive: bool,
    /// The target is mid-attack and can be countered.
    pub counter_open: bool,
}

/// Synchronous world queries for the current tick.
pub trait WorldQuery {
    /// Actors touching a circle. Callers filter out their own faction.
    fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<Target>;

    /// The player as enemies see it, if one is alive in the world.
    fn player(&self) -> Option<Target> {
        None
    }
}

/// A world with nobody else in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl WorldQuery for EmptyWorld {
    fn overlap_circle(&self, _center: Vec2, _radius: f32) -> Vec<Target> {
        Vec::new()
    }
}

/// Every live actor this frame, keyed by entity.
///
/// Rebuilt before the brains tick. Doubles as a distance-based
/// [`WorldQuery`] when no physics context is available.
#[derive(Resource, Debug, Clone, Default)]
pub struct TargetIndex {
    targets: HashMap<Entity, Target>,
    player: Option<Entity>,
}

impl TargetIndex {
    pub fn clear(&mut self) {
        self.targets.clear();
        self.player = None;
    }

    pub fn insert(&mut self, target: Target) {
        if target.faction == Faction::Player {
            self.player = Some(target.entity);
        }
        self.targets.insert(target.entity, target);
    }

    pub fn get(&self, entity: Entity) -> Option<&Target> {
        self.targets.get(&entity)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl WorldQuery for TargetIndex {
    fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<Target> {
        self.targets
            .values()
            .filter(|t| t.position.distance(center) <= radius + t.radius)
            .copied()
            .collect()
    }

    fn player(&self) -> Option<Target> {
        self.player.and_then(|entity| self.targets.get(&entity).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(index: u32, x: f32, faction: Faction) -> Target {
        Target {
            entity: Entity::from_raw(index),
            position: Vec2::new(x, 0.0),
            radius: 10.0,
            faction,
            alive: true,
            counter_open: false,
        }
    }

    #[test]
    fn overlap_counts_target_radius() {
        let mut index = TargetIndex::default();
        index.insert(target(1, 45.0, Faction::Enemy));
        index.insert(target(2, 80.0, Faction::Enemy));

        let hits = index.overlap_circle(Vec2::ZERO, 40.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, Entity::from_raw(1));
    }

    #[test]
    fn player_is_tracked() {
        let mut index = TargetIndex::default();
        index.insert(target(7, 0.0, Faction::Player));
        assert_eq!(index.player().map(|t| t.entity), Some(Entity::from_raw(7)));
        index.clear();
        assert!(index.player().is_none());
        assert!(index.is_empty());
    }
}
