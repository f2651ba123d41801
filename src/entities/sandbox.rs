use bevy::app::{App, FixedUpdate, Plugin, Startup, Update};
use bevy::asset::{Assets, Handle};
use bevy::core_pipeline::clear_color::ClearColorConfig;
use bevy::core_pipeline::core_2d::{Camera2d, Camera2dBundle};
use bevy::ecs::change_detection::DetectChanges;
use bevy::ecs::component::Component;
use bevy::ecs::event::{Event, EventReader, EventWriter};
use bevy::ecs::query::With;
use bevy::ecs::schedule::{IntoSystemConfigs, IntoSystemSetConfigs, SystemSet};
use bevy::ecs::system::{Commands, Query, Res, ResMut, Resource};
use bevy::input::keyboard::KeyCode;
use bevy::input::Input;
use bevy::log::{error, info};
use bevy::math::Vec2;
use bevy::render::color::Color;
use bevy::render::texture::Image;
use bevy::sprite::{Sprite, SpriteBundle};
use bevy::time::{Fixed, Time};
use bevy::window::{PrimaryWindow, Window};
use strum_macros::Display;

use crate::physics::fallingsand::simulation::{Simulation, SimulationConfig};

/// Ordering of the sandbox systems
/// In [FixedUpdate] input is read before the tick, in [Update] commands run before rendering
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SandboxSet {
    Input,
    Tick,
    Commands,
    Render,
}

/// Commands coming from the keyboard or the gui
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum WorldCommand {
    Save,
    Load,
    Reset,
}

/// Runs the sandbox: ticking, commands, and drawing the world to a sprite
#[derive(Default)]
pub struct SandboxPlugin {
    pub config: SimulationConfig,
}

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            .insert_resource(SandboxData::new(Simulation::new(self.config.clone())))
            .add_event::<WorldCommand>()
            .configure_sets(FixedUpdate, (SandboxSet::Input, SandboxSet::Tick).chain())
            .configure_sets(Update, (SandboxSet::Commands, SandboxSet::Render).chain())
            .add_systems(Startup, SandboxData::setup_system)
            .add_systems(FixedUpdate, SandboxData::tick_system.in_set(SandboxSet::Tick))
            .add_systems(
                Update,
                (
                    SandboxData::keyboard_command_system,
                    SandboxData::apply_command_system,
                )
                    .chain()
                    .in_set(SandboxSet::Commands),
            )
            .add_systems(Update, SandboxData::render_system.in_set(SandboxSet::Render));
    }
}

/// Put this alongside the sprite that shows the world
#[derive(Component, Debug, Clone, Copy)]
pub struct WorldSprite;

/// The image asset the world is drawn into
#[derive(Resource, Debug, Clone)]
pub struct WorldTexture(pub Handle<Image>);

/// The live simulation
/// Every system touching the world goes through this resource, so a tick,
/// a command and a render never overlap
#[derive(Resource, Debug)]
pub struct SandboxData {
    pub simulation: Simulation,
    /// The outcome of the last command, shown to the user
    pub status: Option<String>,
}

impl SandboxData {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            simulation,
            status: None,
        }
    }

    /// Runs a command against the simulation and records how it went
    pub fn execute(&mut self, command: WorldCommand) {
        let result = match command {
            WorldCommand::Save => self.simulation.save(),
            WorldCommand::Load => self.simulation.load(),
            WorldCommand::Reset => {
                self.simulation.reset();
                Ok(())
            }
        };
        match result {
            Ok(()) => {
                info!("{} succeeded", command);
                self.status = Some(format!(
                    "{} at tick {}",
                    command,
                    self.simulation.get_element_grid().get_tick()
                ));
            }
            Err(err) => {
                error!("{} failed: {}", command, err);
                self.status = Some(format!("{} failed: {}", command, err));
            }
        }
    }
}

/// Bevy Systems
impl SandboxData {
    /// Spawns the camera and the sprite showing the world
    pub fn setup_system(
        mut commands: Commands,
        mut images: ResMut<Assets<Image>>,
        sandbox: Res<SandboxData>,
    ) {
        commands.spawn(Camera2dBundle {
            camera_2d: Camera2d {
                clear_color: ClearColorConfig::Custom(Color::BLACK),
            },
            ..Default::default()
        });

        let texture = sandbox
            .simulation
            .get_element_grid()
            .get_texture()
            .to_bevy_image();
        let handle = images.add(texture);
        commands.spawn((
            SpriteBundle {
                texture: handle.clone(),
                ..Default::default()
            },
            WorldSprite,
        ));
        commands.insert_resource(WorldTexture(handle));
    }

    /// One simulation step, run on the fixed timestep
    pub fn tick_system(mut sandbox: ResMut<SandboxData>) {
        let mut rng = rand::thread_rng();
        sandbox.simulation.tick(&mut rng);
    }

    /// Ctrl+S saves, Ctrl+L loads, Ctrl+R resets
    pub fn keyboard_command_system(
        keys: Res<Input<KeyCode>>,
        mut commands: EventWriter<WorldCommand>,
    ) {
        if !keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
            return;
        }
        if keys.just_pressed(KeyCode::S) {
            commands.send(WorldCommand::Save);
        }
        if keys.just_pressed(KeyCode::L) {
            commands.send(WorldCommand::Load);
        }
        if keys.just_pressed(KeyCode::R) {
            commands.send(WorldCommand::Reset);
        }
    }

    pub fn apply_command_system(
        mut events: EventReader<WorldCommand>,
        mut sandbox: ResMut<SandboxData>,
    ) {
        for command in events.read() {
            sandbox.execute(*command);
        }
    }

    /// Copies the world into its texture and stretches the sprite over the window
    pub fn render_system(
        sandbox: Res<SandboxData>,
        texture: Res<WorldTexture>,
        mut images: ResMut<Assets<Image>>,
        windows: Query<&Window, With<PrimaryWindow>>,
        mut sprites: Query<&mut Sprite, With<WorldSprite>>,
    ) {
        if let Ok(window) = windows.get_single() {
            let size = Vec2::new(window.width(), window.height());
            for mut sprite in sprites.iter_mut() {
                if sprite.custom_size != Some(size) {
                    sprite.custom_size = Some(size);
                }
            }
        }

        if !sandbox.is_changed() {
            return;
        }
        let raw = sandbox.simulation.get_element_grid().get_texture();
        if let Some(image) = images.get_mut(&texture.0) {
            if image.texture_descriptor.size == raw.extent() {
                image.data = raw.pixels;
            } else {
                *image = raw.to_bevy_image();
            }
        }
    }
}
