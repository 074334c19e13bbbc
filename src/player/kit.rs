//! Player-only bookkeeping that outlives a single state activation.

use bevy::prelude::*;

/// Where the thrown sword is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwordStatus {
    #[default]
    InHand,
    /// Thrown; `entity` is filled in once the projectile exists.
    Thrown { entity: Option<Entity> },
    Returning { entity: Option<Entity> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerKit {
    /// Seconds until the next dash is allowed.
    pub dash_cooldown: f32,
    pub air_dashes_used: u32,
    /// Direction chosen when the current dash began.
    pub dash_direction: f32,
    /// Seconds until the cast skill is ready.
    pub cast_cooldown: f32,
    pub sword: SwordStatus,
    /// Last known sword position, used to face it on catch.
    pub sword_position: Option<Vec2>,
    /// Seconds of spawn protection left.
    pub respawn_guard: f32,
}

impl PlayerKit {
    pub fn advance(&mut self, dt: f32, grounded: bool) {
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.cast_cooldown = (self.cast_cooldown - dt).max(0.0);
        if grounded {
            self.air_dashes_used = 0;
        }
    }

    pub fn has_sword(&self) -> bool {
        self.sword == SwordStatus::InHand
    }

    pub fn sword_entity(&self) -> Option<Entity> {
        match self.sword {
            SwordStatus::InHand => None,
            SwordStatus::Thrown { entity } | SwordStatus::Returning { entity } => entity,
        }
    }

    /// Mark the sword as on its way back. False if it was not out.
    pub fn recall_sword(&mut self) -> bool {
        match self.sword {
            SwordStatus::Thrown { entity } => {
                self.sword = SwordStatus::Returning { entity };
                true
            }
            _ => false,
        }
    }

    pub fn attach_sword(&mut self, entity: Entity) {
        match &mut self.sword {
            SwordStatus::Thrown { entity: slot } | SwordStatus::Returning { entity: slot } => {
                *slot = Some(entity);
            }
            SwordStatus::InHand => warn!("sword {:?} attached while still in hand", entity),
        }
    }

    pub fn catch_sword(&mut self) {
        self.sword = SwordStatus::InHand;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_refunds_air_dashes() {
        let mut kit = PlayerKit {
            air_dashes_used: 1,
            dash_cooldown: 0.5,
            ..default()
        };
        kit.advance(0.2, false);
        assert_eq!(kit.air_dashes_used, 1);
        assert!((kit.dash_cooldown - 0.3).abs() < 1e-6);
        kit.advance(0.2, true);
        assert_eq!(kit.air_dashes_used, 0);
    }

    #[test]
    fn recall_only_from_thrown() {
        let mut kit = PlayerKit::default();
        assert!(!kit.recall_sword());
        kit.sword = SwordStatus::Thrown { entity: None };
        kit.attach_sword(Entity::from_raw(9));
        assert!(kit.recall_sword());
        assert!(!kit.recall_sword());
        assert_eq!(kit.sword_entity(), Some(Entity::from_raw(9)));
    }
}
