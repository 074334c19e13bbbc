//! Sound effects played through kira.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioSource};
use serde::Deserialize;

use crate::actor::SoundId;
use crate::core::load_or_default;

/// Sound table file: one path per sound, relative to `assets/`.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SoundTable {
    pub volume: f64,
    pub sounds: HashMap<SoundId, String>,
}

impl Default for SoundTable {
    fn default() -> Self {
        Self {
            volume: 0.6,
            sounds: HashMap::new(),
        }
    }
}

/// Loaded sound handles, keyed by [`SoundId`].
#[derive(Resource, Default)]
pub struct SfxLibrary {
    volume: f64,
    handles: HashMap<SoundId, Handle<AudioSource>>,
}

impl SfxLibrary {
    pub fn get(&self, id: SoundId) -> Option<&Handle<AudioSource>> {
        self.handles.get(&id)
    }

    /// Fire and forget. Sounds without a loaded clip are skipped.
    pub fn play(&self, audio: &Audio, id: SoundId) {
        match self.get(id) {
            Some(handle) => {
                audio.play(handle.clone()).with_volume(self.volume);
            }
            None => debug!("No clip for sound {:?}", id),
        }
    }
}

/// Load the sound table from assets/data/sounds.ron.
pub fn load_sfx(asset_server: Res<AssetServer>, mut library: ResMut<SfxLibrary>) {
    let table: SoundTable = load_or_default("assets/data/sounds.ron");
    library.volume = table.volume;
    library.handles = table
        .sounds
        .into_iter()
        .map(|(id, path)| (id, asset_server.load(path)))
        .collect();
    info!("Loaded {} sound effects", library.handles.len());
}
