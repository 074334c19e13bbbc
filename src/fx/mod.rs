//! Fire-and-forget effect sinks: audio, sprite feedback and projectiles.

mod audio;
mod feedback;
mod plugin;
mod projectile;
mod systems;

pub use audio::{SfxLibrary, SoundTable};
pub use feedback::{Fade, FloatingText, Tint};
pub use plugin::FxPlugin;
pub use projectile::{Projectile, ThrownSword};
pub use systems::drain_effects;
