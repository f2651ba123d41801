use bevy::ecs::entity::Entity;
use bevy::ecs::query::With;
use bevy::ecs::system::{Query, Res, ResMut};
use bevy::input::mouse::MouseButton;
use bevy::input::Input;
use bevy::math::Vec2;
use bevy::window::{PrimaryWindow, Window};
use bevy_egui::EguiContexts;

use crate::entities::sandbox::SandboxData;
use crate::physics::fallingsand::brush::PointerState;
use crate::physics::fallingsand::util::vectors::SignedXyVector;

/// Maps a cursor position in window coordinates to a cell of the world
/// The world is stretched over the whole window. Window y grows downwards
/// while world y grows upwards. The result is not clamped.
/// Returns None for a window with no area, such as a minimized one.
pub fn window_to_grid(
    cursor: Vec2,
    window_size: Vec2,
    grid_width: usize,
    grid_height: usize,
) -> Option<SignedXyVector> {
    if window_size.x <= 0.0 || window_size.y <= 0.0 {
        return None;
    }
    let x = (cursor.x * grid_width as f32 / window_size.x).floor();
    let y = (grid_height as f32 - cursor.y * grid_height as f32 / window_size.y).floor();
    Some(SignedXyVector::new(x as i64, y as i64))
}

/// The pointer for the next tick
/// The position is kept from the last time the cursor was over the world.
/// While the gui wants the pointer no button is held, so clicking a
/// window never paints the world under it.
pub fn next_pointer(
    previous: PointerState,
    cursor_cell: Option<SignedXyVector>,
    left: bool,
    right: bool,
    over_gui: bool,
) -> PointerState {
    PointerState {
        pos: cursor_cell.unwrap_or(previous.pos),
        primary: left && !over_gui,
        secondary: right && !over_gui,
    }
}

/// Left button paints, right button pours water
pub fn pointer_system(
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    mouse: Res<Input<MouseButton>>,
    mut contexts: EguiContexts,
    mut sandbox: ResMut<SandboxData>,
) {
    let Ok((window_entity, window)) = windows.get_single() else {
        return;
    };
    let over_gui = contexts
        .try_ctx_for_window_mut(window_entity)
        .is_some_and(|ctx| ctx.wants_pointer_input());
    let grid = sandbox.simulation.get_element_grid();
    let cursor_cell = window.cursor_position().and_then(|cursor| {
        window_to_grid(
            cursor,
            Vec2::new(window.width(), window.height()),
            grid.get_width(),
            grid.get_height(),
        )
    });
    let previous = *sandbox.simulation.get_pointer();
    let pointer = next_pointer(
        previous,
        cursor_cell,
        mouse.pressed(MouseButton::Left),
        mouse.pressed(MouseButton::Right),
        over_gui,
    );
    if pointer != previous {
        sandbox.simulation.set_pointer(pointer);
    }
}
