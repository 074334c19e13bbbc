//! UI module - HUD and overlays.

mod hud;
mod plugin;

pub use hud::{state_label, HealthBar, HudRoot, StateReadout};
pub use plugin::UiPlugin;
