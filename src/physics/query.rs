//! World queries backed by rapier's query pipeline.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::actor::{Target, TargetIndex, WorldQuery};

/// System parameter bundling everything a state may ask of the world.
#[derive(SystemParam)]
pub struct WorldAccess<'w, 's> {
    contexts: Query<'w, 's, &'static RapierContext>,
    index: Res<'w, TargetIndex>,
}

impl WorldAccess<'_, '_> {
    pub fn view(&self) -> RapierWorld<'_> {
        RapierWorld {
            context: self.contexts.get_single().ok(),
            index: &self.index,
        }
    }
}

/// [`WorldQuery`] over this frame's physics state.
///
/// Overlaps come from rapier shape intersections and are resolved to
/// targets through the [`TargetIndex`]. Without a physics context the index's
/// own distance test is used.
pub struct RapierWorld<'a> {
    context: Option<&'a RapierContext>,
    index: &'a TargetIndex,
}

impl WorldQuery for RapierWorld<'_> {
    fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<Target> {
        let Some(context) = self.context else {
            return self.index.overlap_circle(center, radius);
        };

        let mut found = Vec::new();
        let shape = Collider::ball(radius);
        context.intersections_with_shape(
            center,
            0.0,
            &shape,
            QueryFilter::default().exclude_sensors(),
            |entity| {
                if let Some(target) = self.index.get(entity) {
                    found.push(*target);
                }
                true // Continue checking other entities
            },
        );
        found
    }

    fn player(&self) -> Option<Target> {
        self.index.player()
    }
}
