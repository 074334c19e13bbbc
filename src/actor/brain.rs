//! The component that owns an actor's state machine.

use bevy::prelude::*;

use super::components::Actor;
use super::world::{Faction, WorldQuery};
use crate::animation::ClipId;
use crate::combat::{DamageOutcome, IncomingHit};
use crate::fsm::{AnimationEvent, StateMachineError};

/// An actor together with its state machine, as the ECS layer sees it.
///
/// Player and enemy brains carry different state sets and contexts. The
/// generic systems in `physics`, `animation`, `combat` and `fx` only need
/// this surface.
pub trait Brain: Component {
    fn actor(&self) -> &Actor;

    fn actor_mut(&mut self) -> &mut Actor;

    fn faction(&self) -> Faction;

    /// Clip set this actor plays from the clip library.
    fn rig(&self) -> &str;

    /// Run one simulation tick of the current state.
    fn tick(&mut self, dt: f32, world: &dyn WorldQuery);

    /// Damage entry point for other entities' combat resolution.
    fn take_damage(&mut self, hit: &IncomingHit) -> DamageOutcome;

    /// Deliver an animation marker to whichever state is current.
    fn on_animation_event(&mut self, event: AnimationEvent, world: &dyn WorldQuery);

    /// Clip the current state wants playing.
    fn clip(&self) -> Option<ClipId>;

    /// Changes every time a state is entered, so re-entering the same
    /// state restarts its clip.
    fn activation(&self) -> u64;

    /// Debug name of the current state.
    fn state_name(&self) -> String;

    /// The actor is mid-action and must not be given new commands.
    fn is_busy(&self) -> bool {
        self.actor().is_busy()
    }

    /// Whether an incoming hit may cut the current state short.
    fn can_be_interrupted(&self) -> bool;

    /// The actor is mid-attack and can be countered.
    fn counter_open(&self) -> bool {
        false
    }
}

/// Log a kernel error raised while driving `who`'s machine.
///
/// Refusals from a terminal state are expected once an actor is dead.
pub fn report_fsm_error(who: &str, error: &StateMachineError) {
    match error {
        StateMachineError::Terminal { .. } => debug!("{}: {}", who, error),
        _ => warn!("{}: {}", who, error),
    }
}
