//! Combat value types: health, invincibility, knockback and combo bookkeeping.

use std::collections::HashMap;

use bevy::prelude::*;

/// Hit points of an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Remove up to `amount` and return how much was actually taken.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }
}

/// Independent reasons an actor can be protected from damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvincibilitySource {
    Dash,
    Respawn,
}

/// Damage immunity composed from every active source.
///
/// Each source keeps its own count, so one source switching off never
/// cancels protection another source still holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invincibility {
    holds: HashMap<InvincibilitySource, u32>,
}

impl Invincibility {
    /// Begin (`true`) or end (`false`) one window for `source`.
    pub fn make_invincible(&mut self, source: InvincibilitySource, on: bool) {
        if on {
            *self.holds.entry(source).or_default() += 1;
            return;
        }

        match self.holds.get_mut(&source) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.holds.remove(&source);
            }
            None => warn!("invincibility for {:?} ended without a matching begin", source),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.holds.is_empty()
    }

    pub fn holds(&self, source: InvincibilitySource) -> u32 {
        self.holds.get(&source).copied().unwrap_or(0)
    }

    /// Total open windows across all sources.
    pub fn count(&self) -> u32 {
        self.holds.values().sum()
    }
}

/// Knockback computed when damage lands and consumed by the reacting state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnockbackRequest {
    /// +1 pushes right, -1 pushes left.
    pub direction: f32,
    /// Magnitude per axis; x is scaled by `direction`.
    pub force: Vec2,
}

impl KnockbackRequest {
    /// Push a target at `target_x` away from an attacker at `attacker_x`.
    ///
    /// An attacker exactly level with the target pushes it right.
    pub fn away_from(target_x: f32, attacker_x: f32, force: Vec2) -> Self {
        let direction = if attacker_x > target_x { -1.0 } else { 1.0 };
        Self { direction, force }
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.force.x * self.direction, self.force.y)
    }
}

/// Attack-chain index for a primary attack with a fixed movement table.
///
/// The index advances when an attack finishes, so the next attack sees the
/// incremented value. It falls back to zero when the chain would run past the
/// table or when the window since the last finished attack has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboCounter {
    next: usize,
    current: usize,
    last_attack: Option<f32>,
    window: f32,
    len: usize,
}

impl ComboCounter {
    pub fn new(len: usize, window: f32) -> Self {
        Self {
            next: 0,
            current: 0,
            last_attack: None,
            window,
            len: len.max(1),
        }
    }

    /// Pick the index for an attack starting at `now`.
    pub fn start(&mut self, now: f32) -> usize {
        let expired = self
            .last_attack
            .is_some_and(|last| now >= last + self.window);
        if self.next >= self.len || expired {
            self.next = 0;
        }
        self.current = self.next;
        self.current
    }

    /// Record that the attack started by the last `start` ended at `now`.
    pub fn finish(&mut self, now: f32) {
        self.next = self.current + 1;
        self.last_attack = Some(now);
    }

    /// Index used by the most recent attack.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Index the next attack would use if it started inside the window.
    pub fn next(&self) -> usize {
        self.next
    }

    pub fn window(&self) -> f32 {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_clamps_at_zero() {
        let mut health = Health::new(30.0);
        assert_eq!(health.take_damage(50.0), 30.0);
        assert!(health.is_dead());
        assert_eq!(health.percentage(), 0.0);
    }

    #[test]
    fn overlapping_invincibility_sources_compose() {
        let mut inv = Invincibility::default();
        inv.make_invincible(InvincibilitySource::Respawn, true);
        inv.make_invincible(InvincibilitySource::Dash, true);
        inv.make_invincible(InvincibilitySource::Dash, false);
        assert!(inv.is_active(), "respawn protection must survive the dash ending");

        inv.make_invincible(InvincibilitySource::Respawn, false);
        assert!(!inv.is_active());
    }

    #[test]
    fn same_source_nests() {
        let mut inv = Invincibility::default();
        inv.make_invincible(InvincibilitySource::Dash, true);
        inv.make_invincible(InvincibilitySource::Dash, true);
        inv.make_invincible(InvincibilitySource::Dash, false);
        assert_eq!(inv.holds(InvincibilitySource::Dash), 1);
        assert!(inv.is_active());
    }

    #[test]
    fn unmatched_end_is_ignored() {
        let mut inv = Invincibility::default();
        inv.make_invincible(InvincibilitySource::Respawn, false);
        assert_eq!(inv.count(), 0);
        assert!(!inv.is_active());
    }

    #[test]
    fn knockback_points_away_from_attacker() {
        let force = Vec2::new(300.0, 400.0);
        let from_left = KnockbackRequest::away_from(10.0, -5.0, force);
        assert_eq!(from_left.velocity(), Vec2::new(300.0, 400.0));

        let from_right = KnockbackRequest::away_from(10.0, 25.0, force);
        assert_eq!(from_right.velocity(), Vec2::new(-300.0, 400.0));
    }

    #[test]
    fn combo_advances_inside_window() {
        let mut combo = ComboCounter::new(3, 2.0);
        assert_eq!(combo.start(0.0), 0);
        combo.finish(0.0);
        assert_eq!(combo.start(1.0), 1);
    }

    #[test]
    fn combo_resets_after_window() {
        let mut combo = ComboCounter::new(3, 2.0);
        combo.start(0.0);
        combo.finish(0.0);
        assert_eq!(combo.start(3.0), 0);
    }

    #[test]
    fn combo_wraps_after_last_entry() {
        let mut combo = ComboCounter::new(3, 2.0);
        for (t, expected) in [(0.0, 0), (0.5, 1), (1.0, 2)] {
            assert_eq!(combo.start(t), expected);
            combo.finish(t);
        }
        assert_eq!(combo.next(), 3);
        assert_eq!(combo.start(1.5), 0);
    }
}
