//! Core game module - states, events, data loading and system ordering.
//!
//! This module provides the foundation that all other game systems build upon.

mod data;
mod events;
mod plugin;
mod states;

pub use data::*;
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
