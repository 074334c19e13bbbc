//! The per-frame tick shared by every kind of brain.

use bevy::prelude::*;

use super::brain::Brain;
use crate::physics::WorldAccess;

/// Run one simulation tick of every brain of type `B`.
pub fn tick_brains<B: Brain>(time: Res<Time>, world: WorldAccess, mut query: Query<&mut B>) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }
    let view = world.view();
    for mut brain in query.iter_mut() {
        brain.tick(dt, &view);
    }
}
