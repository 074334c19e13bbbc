//! Stand-in animation collaborator.
//!
//! States only name the clip they want. Playback runs on fixed timelines
//! loaded from `assets/data/clips.ron` and reports the markers it passes as
//! [`crate::fsm::AnimationEvent`]s.

mod clips;
mod playback;
mod plugin;

pub use clips::{ClipDef, ClipFile, ClipId, ClipLibrary, Marker};
pub use playback::{advance_clips, deliver_signals, ClipPlayer};
pub use plugin::AnimationPlugin;
