use bevy::ecs::event::EventWriter;
use bevy::ecs::system::Res;
use bevy_egui::{egui, EguiContexts};
use strum::IntoEnumIterator;

use crate::entities::sandbox::{SandboxData, WorldCommand};
use crate::physics::fallingsand::elements::element::ElementType;

/// A small window with the state of the world and buttons for the world commands
pub fn world_window_system(
    mut contexts: EguiContexts,
    sandbox: Res<SandboxData>,
    mut commands: EventWriter<WorldCommand>,
) {
    let grid = sandbox.simulation.get_element_grid();
    let counts = grid.element_counts();
    egui::Window::new("World").show(contexts.ctx_mut(), |ui| {
        ui.label(format!("Size: {}x{}", grid.get_width(), grid.get_height()));
        ui.label(format!("Tick: {}", grid.get_tick()));
        ui.separator();
        for element in ElementType::iter() {
            let count = counts.get(&element).copied().unwrap_or(0);
            ui.label(format!("{}: {}", element, count));
        }
        ui.separator();
        ui.horizontal(|ui| {
            for command in [WorldCommand::Save, WorldCommand::Load, WorldCommand::Reset] {
                if ui.button(command.to_string()).clicked() {
                    commands.send(command);
                }
            }
        });
        if let Some(status) = &sandbox.status {
            ui.label(status.as_str());
        }
    });
}
