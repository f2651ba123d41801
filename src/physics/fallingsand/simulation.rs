//! The simulation context
//! Owns the world, the pointer and the brush, and runs one tick at a time.
//! Nothing in here is global, the host owns a [Simulation] and hands it around.

use std::path::{Path, PathBuf};

use bevy::log::{info, warn};
use rand::Rng;

use super::brush::{Brush, PointerState, DEFAULT_BRUSH_RADIUS, DEFAULT_PAINT_PROBABILITY};
use super::data::element_grid::ElementGrid;
use super::data::snapshot::{Snapshot, SnapshotError};

/// Scale applied to the 640x480 reference resolution to get the default world size
pub const DEFAULT_SCALE: f32 = 0.5;
/// Ticks per second
pub const DEFAULT_TICK_HZ: f64 = 60.0;
/// Where save and load go unless configured otherwise
pub const DEFAULT_SAVE_PATH: &str = "./save/world.json";

/// Settings for a [Simulation]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub width: usize,
    pub height: usize,
    pub tick_hz: f64,
    pub brush_radius: i64,
    pub paint_probability: f64,
    pub save_path: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfigBuilder::new().build()
    }
}

/// Builds a [SimulationConfig], every setting has a default
#[derive(Debug, Clone)]
pub struct SimulationConfigBuilder {
    width: usize,
    height: usize,
    tick_hz: f64,
    brush_radius: i64,
    paint_probability: f64,
    save_path: PathBuf,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self {
            width: (640.0 * DEFAULT_SCALE) as usize,
            height: (480.0 * DEFAULT_SCALE) as usize,
            tick_hz: DEFAULT_TICK_HZ,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            paint_probability: DEFAULT_PAINT_PROBABILITY,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
        }
    }
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    pub fn tick_hz(mut self, tick_hz: f64) -> Self {
        self.tick_hz = tick_hz;
        self
    }
    pub fn brush_radius(mut self, brush_radius: i64) -> Self {
        self.brush_radius = brush_radius;
        self
    }
    pub fn paint_probability(mut self, paint_probability: f64) -> Self {
        self.paint_probability = paint_probability;
        self
    }
    pub fn save_path(mut self, save_path: impl Into<PathBuf>) -> Self {
        self.save_path = save_path.into();
        self
    }
    /// Paint probabilities outside [0, 1] are clamped, NaN falls back to the default
    pub fn build(self) -> SimulationConfig {
        debug_assert!(self.width > 0, "Width must be positive");
        debug_assert!(self.height > 0, "Height must be positive");
        debug_assert!(self.tick_hz > 0.0, "Tick rate must be positive");
        let paint_probability = if self.paint_probability.is_nan() {
            DEFAULT_PAINT_PROBABILITY
        } else {
            self.paint_probability.clamp(0.0, 1.0)
        };
        if paint_probability != self.paint_probability {
            warn!(
                "Paint probability {} is outside [0, 1], using {}",
                self.paint_probability, paint_probability
            );
        }
        SimulationConfig {
            width: self.width,
            height: self.height,
            tick_hz: self.tick_hz,
            brush_radius: self.brush_radius,
            paint_probability,
            save_path: self.save_path,
        }
    }
}

/// The whole state of a running sandbox
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    element_grid: ElementGrid,
    pointer: PointerState,
    brush: Brush,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let element_grid = ElementGrid::new_empty(config.width, config.height);
        let brush = Brush::new(config.brush_radius, config.paint_probability);
        Self {
            config,
            element_grid,
            pointer: PointerState::default(),
            brush,
        }
    }

    pub fn get_element_grid(&self) -> &ElementGrid {
        &self.element_grid
    }
    pub fn get_pointer(&self) -> &PointerState {
        &self.pointer
    }
    pub fn set_pointer(&mut self, pointer: PointerState) {
        self.pointer = pointer;
    }

    /// One simulation step: every element moves, then the brush paints
    pub fn tick(&mut self, rng: &mut impl Rng) {
        self.element_grid.process();
        self.brush.apply(&mut self.element_grid, &self.pointer, rng);
    }

    /// Writes the current world to the configured save path
    pub fn save(&self) -> Result<(), SnapshotError> {
        self.save_to(&self.config.save_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SnapshotError> {
        Snapshot::from_grid(&self.element_grid).save_to_path(path)
    }

    /// Replaces the world with the one at the configured save path
    /// On failure the current world is left untouched
    pub fn load(&mut self) -> Result<(), SnapshotError> {
        let path = self.config.save_path.clone();
        self.load_from(&path)
    }

    pub fn load_from(&mut self, path: &Path) -> Result<(), SnapshotError> {
        let loaded = Snapshot::load_from_path(path)
            .and_then(Snapshot::into_grid)
            .map_err(|err| {
                warn!("Failed to load world from {:?}: {}", path, err);
                err
            })?;
        info!(
            "Loaded {}x{} world at tick {}",
            loaded.get_width(),
            loaded.get_height(),
            loaded.get_tick()
        );
        self.element_grid = loaded;
        Ok(())
    }

    /// Replaces the world with a fresh, empty, default sized one
    pub fn reset(&mut self) {
        self.element_grid = ElementGrid::new_empty(self.config.width, self.config.height);
        info!("Reset world to {}x{}", self.config.width, self.config.height);
    }
}
