//! Per-enemy bookkeeping shared by the enemy states.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Attack pacing, counter window and randomness for one enemy.
///
/// Lives beside the actor in the brain and is shared by all enemy states.
#[derive(Debug, Clone)]
pub struct EnemyKit {
    /// Actor clock time the last attack ended at.
    last_attack: Option<f32>,
    cooldown: f32,
    counter_open: bool,
    /// +1 pushes the stunned enemy right, -1 left.
    stun_direction: f32,
    rng: StdRng,
}

impl EnemyKit {
    pub fn new(seed: u64) -> Self {
        Self {
            last_attack: None,
            cooldown: 0.0,
            counter_open: false,
            stun_direction: 1.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Whether the cooldown since the last attack has run out at `now`.
    pub fn can_attack(&self, now: f32) -> bool {
        self.last_attack.map_or(true, |last| now >= last + self.cooldown)
    }

    /// Stamp the end of an attack and roll the next cooldown from `range`.
    pub fn finish_attack(&mut self, now: f32, range: (f32, f32)) {
        self.last_attack = Some(now);
        self.cooldown = self.roll(range);
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Uniform value in `min..=max`. A collapsed or inverted range yields `min`.
    pub fn roll(&mut self, (min, max): (f32, f32)) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    pub fn counter_open(&self) -> bool {
        self.counter_open
    }

    /// Open or close the counter window. Returns true when it changed.
    pub fn set_counter_open(&mut self, open: bool) -> bool {
        std::mem::replace(&mut self.counter_open, open) != open
    }

    pub fn stun_direction(&self) -> f32 {
        self.stun_direction
    }

    pub fn set_stun_direction(&mut self, direction: f32) {
        self.stun_direction = direction.signum();
    }

    /// Push the next stun away from an attacker standing at `attacker_x`.
    pub fn stun_away_from(&mut self, own_x: f32, attacker_x: f32) {
        self.stun_direction = if attacker_x > own_x { -1.0 } else { 1.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_rolls_inside_range() {
        let mut kit = EnemyKit::new(7);
        assert!(kit.can_attack(0.0));
        for step in 0..20 {
            let now = step as f32 * 5.0;
            kit.finish_attack(now, (1.0, 2.0));
            assert!((1.0..=2.0).contains(&kit.cooldown()));
            assert!(!kit.can_attack(now + 0.5));
            assert!(kit.can_attack(now + 2.0));
        }
    }

    #[test]
    fn inverted_range_uses_min() {
        let mut kit = EnemyKit::new(1);
        assert_eq!(kit.roll((3.0, 1.0)), 3.0);
    }

    #[test]
    fn counter_window_reports_changes() {
        let mut kit = EnemyKit::new(1);
        assert!(kit.set_counter_open(true));
        assert!(!kit.set_counter_open(true));
        assert!(kit.counter_open());
        assert!(kit.set_counter_open(false));
    }
}
