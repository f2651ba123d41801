//! This module contains all the GUI related code.
//! Things that are drawn to via screen coordinates rather than world coordinates.

use bevy::app::{App, FixedUpdate, Plugin, Update};
use bevy::ecs::schedule::IntoSystemConfigs;

use crate::entities::sandbox::SandboxSet;

pub mod brush;
pub mod world_window;

/// Pointer tracking and the world window
pub struct GuiPlugin;

impl Plugin for GuiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            brush::pointer_system.in_set(SandboxSet::Input),
        )
        .add_systems(
            Update,
            world_window::world_window_system.before(SandboxSet::Commands),
        );
    }
}
