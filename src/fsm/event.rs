//! Typed animation markers delivered by the animation collaborator.

use serde::Deserialize;

/// Marker reached by the clip currently playing on an actor.
///
/// Carries no payload; the state that is current when the event arrives
/// decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AnimationEvent {
    /// The clip reached its end marker. Latches the state's trigger.
    Finished,
    /// Strike frame: melee hit check or projectile release.
    AttackHit,
    /// The attacker is now open to a counter.
    OpenCounterWindow,
    /// The counter opportunity is over.
    CloseCounterWindow,
}

impl AnimationEvent {
    pub fn is_finished(self) -> bool {
        self == AnimationEvent::Finished
    }
}
