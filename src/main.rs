use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::EguiPlugin;
use falling_sand::entities::sandbox::SandboxPlugin;
use falling_sand::gui::GuiPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    level: bevy::log::Level::INFO,
                    ..Default::default()
                })
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Falling Sand".to_string(),
                        resolution: WindowResolution::new(640.0, 480.0),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
        )
        .add_plugins(EguiPlugin)
        .add_plugins(SandboxPlugin::default())
        .add_plugins(GuiPlugin)
        .run();
}
