//! Clip playback: follows each brain's requested clip and reports markers.

use bevy::prelude::*;

use super::clips::{ClipDef, ClipId, ClipLibrary};
use crate::actor::Brain;
use crate::core::AnimationSignal;
use crate::fsm::AnimationEvent;
use crate::physics::WorldAccess;

/// Playback position of the clip an actor is showing.
#[derive(Component, Debug, Clone, Default)]
pub struct ClipPlayer {
    clip: Option<ClipId>,
    activation: u64,
    elapsed: f32,
    next_marker: usize,
    done: bool,
}

impl ClipPlayer {
    pub fn clip(&self) -> Option<ClipId> {
        self.clip
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// True when `clip` for `activation` is not what is playing.
    pub fn needs_restart(&self, clip: Option<ClipId>, activation: u64) -> bool {
        self.clip != clip || self.activation != activation
    }

    pub fn restart(&mut self, clip: Option<ClipId>, activation: u64) {
        *self = Self {
            clip,
            activation,
            ..default()
        };
    }

    /// Move the playhead by `dt` and return every marker passed, in order.
    pub fn advance(&mut self, def: &ClipDef, dt: f32) -> Vec<AnimationEvent> {
        let mut fired = Vec::new();
        if self.done {
            return fired;
        }

        if def.duration <= 0.0 {
            fired.extend(def.markers.iter().map(|m| m.event));
            if !def.looping {
                fired.push(AnimationEvent::Finished);
            }
            self.done = true;
            return fired;
        }

        self.elapsed += dt;
        loop {
            let progress = (self.elapsed / def.duration).min(1.0);
            while let Some(marker) = def.markers.get(self.next_marker) {
                if marker.at > progress {
                    break;
                }
                fired.push(marker.event);
                self.next_marker += 1;
            }

            if self.elapsed < def.duration {
                break;
            }
            if !def.looping {
                fired.push(AnimationEvent::Finished);
                self.done = true;
                break;
            }
            self.elapsed -= def.duration;
            self.next_marker = 0;
        }
        fired
    }
}

/// Restart clips whose state changed, then advance every clip.
pub fn advance_clips<B: Brain>(
    time: Res<Time>,
    library: Res<ClipLibrary>,
    mut query: Query<(Entity, &B, &mut ClipPlayer)>,
    mut signals: EventWriter<AnimationSignal>,
) {
    let dt = time.delta_secs();
    let fallback = ClipDef::one_shot(ClipLibrary::FALLBACK_DURATION);

    for (entity, brain, mut player) in query.iter_mut() {
        let wanted = brain.clip();
        if player.needs_restart(wanted, brain.activation()) {
            player.restart(wanted, brain.activation());
        }
        let Some(clip) = wanted else {
            continue;
        };

        let def = match library.get(brain.rig(), clip) {
            Some(def) => def,
            None => {
                if player.elapsed() == 0.0 {
                    warn!("rig '{}' has no clip {:?}", brain.rig(), clip);
                }
                &fallback
            }
        };

        for event in player.advance(def, dt) {
            signals.send(AnimationSignal { entity, event });
        }
    }
}

/// Hand this frame's markers to the state that is current now.
pub fn deliver_signals<B: Brain>(
    mut signals: EventReader<AnimationSignal>,
    mut brains: Query<&mut B>,
    world: WorldAccess,
) {
    let view = world.view();
    for signal in signals.read() {
        if let Ok(mut brain) = brains.get_mut(signal.entity) {
            brain.on_animation_event(signal.event, &view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack() -> ClipDef {
        ClipDef::one_shot(1.0)
            .with_marker(0.2, AnimationEvent::OpenCounterWindow)
            .with_marker(0.6, AnimationEvent::AttackHit)
    }

    #[test]
    fn markers_fire_once_in_order() {
        let def = attack();
        let mut player = ClipPlayer::default();
        player.restart(Some(ClipId::Attack1), 1);

        assert!(player.advance(&def, 0.1).is_empty());
        assert_eq!(player.advance(&def, 0.2), vec![AnimationEvent::OpenCounterWindow]);
        assert_eq!(
            player.advance(&def, 0.8),
            vec![AnimationEvent::AttackHit, AnimationEvent::Finished]
        );
        assert!(player.advance(&def, 1.0).is_empty());
    }

    #[test]
    fn looping_clip_never_finishes() {
        let def = ClipDef::looping(0.5).with_marker(0.5, AnimationEvent::AttackHit);
        let mut player = ClipPlayer::default();
        let fired = player.advance(&def, 1.1);
        assert_eq!(fired, vec![AnimationEvent::AttackHit, AnimationEvent::AttackHit]);
    }

    #[test]
    fn new_activation_restarts_same_clip() {
        let mut player = ClipPlayer::default();
        player.restart(Some(ClipId::Attack1), 4);
        assert!(!player.needs_restart(Some(ClipId::Attack1), 4));
        assert!(player.needs_restart(Some(ClipId::Attack1), 5));
        assert!(player.needs_restart(Some(ClipId::Attack2), 4));
    }
}
