//! Per-state countdown and animation trigger latch.

/// Timer and trigger latch owned by one state object.
///
/// One core exists per state key and survives across activations, the same
/// way the state object itself does. The machine clears the latch on every
/// exit so a trigger from one activation never reaches the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateCore {
    /// Seconds remaining. Signed and never floored at zero.
    timer: f32,
    /// Seconds since the current activation entered.
    elapsed: f32,
    trigger_called: bool,
}

impl StateCore {
    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn set_timer(&mut self, seconds: f32) {
        self.timer = seconds;
    }

    /// True once the countdown has gone below zero.
    pub fn is_elapsed(&self) -> bool {
        self.timer < 0.0
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn trigger_called(&self) -> bool {
        self.trigger_called
    }

    /// Latch the trigger. Called by the machine when the animation
    /// collaborator reports [`super::AnimationEvent::Finished`].
    pub fn trigger(&mut self) {
        self.trigger_called = true;
    }

    pub(crate) fn begin(&mut self) {
        self.timer = 0.0;
        self.elapsed = 0.0;
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        self.timer -= dt;
        self.elapsed += dt;
    }

    pub(crate) fn clear_trigger(&mut self) {
        self.trigger_called = false;
    }
}
