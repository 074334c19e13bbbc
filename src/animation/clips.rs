//! Clip timelines and the markers they fire.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::{load_ron, DataLoadError};
use crate::fsm::AnimationEvent;

/// Which clip a state wants playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ClipId {
    Idle,
    Move,
    Jump,
    Air,
    WallSlide,
    WallJump,
    Dash,
    Attack1,
    Attack2,
    Attack3,
    Counter,
    CounterSuccess,
    AimSword,
    CatchSword,
    Cast,
    Hurt,
    Battle,
    Stunned,
    Dead,
}

/// An event fired when playback passes `at`, a fraction of the clip.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Marker {
    pub at: f32,
    pub event: AnimationEvent,
}

/// Timeline of one clip.
///
/// One-shot clips fire [`AnimationEvent::Finished`] when they reach their end.
/// Looping clips never finish.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipDef {
    pub duration: f32,
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl ClipDef {
    pub fn looping(duration: f32) -> Self {
        Self {
            duration,
            looping: true,
            markers: Vec::new(),
        }
    }

    pub fn one_shot(duration: f32) -> Self {
        Self {
            duration,
            looping: false,
            markers: Vec::new(),
        }
    }

    pub fn with_marker(mut self, at: f32, event: AnimationEvent) -> Self {
        self.markers.push(Marker { at, event });
        self.normalize();
        self
    }

    /// Clamp markers into the clip and sort them by position.
    fn normalize(&mut self) {
        for marker in &mut self.markers {
            marker.at = marker.at.clamp(0.0, 1.0);
        }
        self.markers.sort_by(|a, b| a.at.total_cmp(&b.at));
    }
}

/// Clip file layout: rig name to clip table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipFile {
    pub rigs: HashMap<String, HashMap<ClipId, ClipDef>>,
}

/// Every clip timeline, grouped by rig.
#[derive(Resource, Debug, Clone)]
pub struct ClipLibrary {
    rigs: HashMap<String, HashMap<ClipId, ClipDef>>,
}

impl ClipLibrary {
    /// Used when a rig has no entry for a clip.
    pub const FALLBACK_DURATION: f32 = 0.5;

    pub fn empty() -> Self {
        Self {
            rigs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, rig: &str, clip: ClipId, mut def: ClipDef) {
        def.normalize();
        self.rigs.entry(rig.to_string()).or_default().insert(clip, def);
    }

    pub fn get(&self, rig: &str, clip: ClipId) -> Option<&ClipDef> {
        self.rigs.get(rig).and_then(|clips| clips.get(&clip))
    }

    /// Overlay every clip in `file` onto this library.
    pub fn merge(&mut self, file: ClipFile) {
        for (rig, clips) in file.rigs {
            for (clip, def) in clips {
                self.insert(&rig, clip, def);
            }
        }
    }

    pub fn rig_count(&self) -> usize {
        self.rigs.len()
    }
}

impl Default for ClipLibrary {
    fn default() -> Self {
        use AnimationEvent::*;

        let mut library = Self::empty();
        let player = [
            (ClipId::Idle, ClipDef::looping(0.8)),
            (ClipId::Move, ClipDef::looping(0.6)),
            (ClipId::Jump, ClipDef::looping(0.3)),
            (ClipId::Air, ClipDef::looping(0.3)),
            (ClipId::WallSlide, ClipDef::looping(0.4)),
            (ClipId::WallJump, ClipDef::looping(0.3)),
            (ClipId::Dash, ClipDef::looping(0.2)),
            (ClipId::Attack1, ClipDef::one_shot(0.35).with_marker(0.4, AttackHit)),
            (ClipId::Attack2, ClipDef::one_shot(0.35).with_marker(0.4, AttackHit)),
            (ClipId::Attack3, ClipDef::one_shot(0.45).with_marker(0.5, AttackHit)),
            (ClipId::Counter, ClipDef::looping(0.3)),
            (ClipId::CounterSuccess, ClipDef::one_shot(0.4)),
            (ClipId::AimSword, ClipDef::looping(0.4)),
            (ClipId::CatchSword, ClipDef::one_shot(0.3)),
            (ClipId::Cast, ClipDef::looping(0.5)),
            (ClipId::Hurt, ClipDef::one_shot(0.3)),
            (ClipId::Dead, ClipDef::one_shot(0.8)),
        ];
        for (clip, def) in player {
            library.insert("player", clip, def);
        }

        let enemy = [
            (ClipId::Idle, ClipDef::looping(0.8)),
            (ClipId::Move, ClipDef::looping(0.6)),
            (ClipId::Battle, ClipDef::looping(0.6)),
            (
                ClipId::Attack1,
                ClipDef::one_shot(0.7)
                    .with_marker(0.2, OpenCounterWindow)
                    .with_marker(0.55, CloseCounterWindow)
                    .with_marker(0.6, AttackHit),
            ),
            (ClipId::Stunned, ClipDef::looping(0.4)),
            (ClipId::Dead, ClipDef::one_shot(0.6)),
        ];
        for (clip, def) in enemy {
            library.insert("enemy", clip, def);
        }

        library
    }
}

/// Load `assets/data/clips.ron` over the built-in timelines.
pub fn load_clip_library(mut library: ResMut<ClipLibrary>) {
    match load_ron::<ClipFile>("assets/data/clips.ron") {
        Ok(file) => {
            library.merge(file);
            info!("Loaded clip library ({} rigs)", library.rig_count());
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("{} not found, using built-in clips", path);
        }
        Err(e) => error!("{}; using built-in clips", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_ron;

    #[test]
    fn markers_are_sorted_and_clamped() {
        let def = ClipDef::one_shot(1.0)
            .with_marker(1.5, AnimationEvent::AttackHit)
            .with_marker(0.2, AnimationEvent::OpenCounterWindow);
        assert_eq!(def.markers[0].event, AnimationEvent::OpenCounterWindow);
        assert_eq!(def.markers[1].at, 1.0);
    }

    #[test]
    fn file_overrides_builtin_clip() {
        let file: ClipFile = parse_ron(
            "(rigs: {\"player\": {Attack1: (duration: 1.0, markers: [(at: 0.5, event: AttackHit)])}})",
            "inline",
        )
        .unwrap();
        let mut library = ClipLibrary::default();
        library.merge(file);

        let def = library.get("player", ClipId::Attack1).unwrap();
        assert_eq!(def.duration, 1.0);
        assert!(!def.looping);
        assert!(library.get("player", ClipId::Attack2).is_some());
    }

    #[test]
    fn player_strikes_only_from_swing_clips() {
        // The counter deals its damage on contact, so its clips carry no hit.
        let library = ClipLibrary::default();
        for clip in [ClipId::Counter, ClipId::CounterSuccess, ClipId::Cast, ClipId::CatchSword] {
            let def = library.get("player", clip).unwrap();
            assert!(
                def.markers.iter().all(|m| m.event != AnimationEvent::AttackHit),
                "{clip:?} fires AttackHit"
            );
        }
        let swing = library.get("player", ClipId::Attack1).unwrap();
        assert!(swing.markers.iter().any(|m| m.event == AnimationEvent::AttackHit));
    }
}
