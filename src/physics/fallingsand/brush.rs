//! Interactive painting on the element grid.
//! The gui layer keeps a [PointerState] up to date, and the brush reads it once per tick
//! after all movement for that tick is done.

use bevy::log::trace;
use itertools::iproduct;
use rand::Rng;

use crate::physics::fallingsand::data::element_grid::ElementGrid;
use crate::physics::fallingsand::elements::element::ElementType;
use crate::physics::fallingsand::util::vectors::SignedXyVector;

/// The brush radius, in cells
pub const DEFAULT_BRUSH_RADIUS: i64 = 10;

/// The chance that any one cell under the brush receives sand while painting
pub const DEFAULT_PAINT_PROBABILITY: f64 = 0.3;

/// Where the pointer is on the grid and which buttons are held
/// Coordinates are not clamped, the brush ignores cells outside the grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PointerState {
    pub pos: SignedXyVector,
    /// Paints sand while held
    pub primary: bool,
    /// Pours water while held
    pub secondary: bool,
}

/// A circular brush
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    radius: i64,
    paint_probability: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_RADIUS, DEFAULT_PAINT_PROBABILITY)
    }
}

impl Brush {
    pub fn new(radius: i64, paint_probability: f64) -> Self {
        debug_assert!(radius >= 0, "Brush radius must not be negative");
        debug_assert!(
            (0.0..=1.0).contains(&paint_probability),
            "Paint probability must be within [0, 1]"
        );
        Self {
            radius,
            paint_probability,
        }
    }

    /// Every offset strictly inside the circle, scanning the square [-r, r) in both axes
    pub fn offsets(&self) -> impl Iterator<Item = (i64, i64)> {
        let r = self.radius;
        iproduct!(-r..r, -r..r)
            .map(|(dy, dx)| (dx, dy))
            .filter(move |(dx, dy)| dx * dx + dy * dy < r * r)
    }

    /// Writes `element` into every empty, in bounds cell under the brush for which `keep` says yes
    /// Returns how many cells were written
    fn apply_element(
        &self,
        element_grid: &mut ElementGrid,
        center: SignedXyVector,
        element: ElementType,
        mut keep: impl FnMut() -> bool,
    ) -> usize {
        let mut written = 0;
        for (dx, dy) in self.offsets() {
            if !keep() {
                continue;
            }
            let (Some(x), Some(y)) = (center.x.checked_add(dx), center.y.checked_add(dy)) else {
                continue;
            };
            if let Some(cell) = element_grid.get(x, y) {
                if element_grid.is_empty(cell) {
                    element_grid.write(cell, element);
                    written += 1;
                }
            }
        }
        written
    }

    /// Scatters sand into empty cells under the brush
    pub fn paint(
        &self,
        element_grid: &mut ElementGrid,
        center: SignedXyVector,
        rng: &mut impl Rng,
    ) -> usize {
        let probability = self.paint_probability;
        self.apply_element(element_grid, center, ElementType::Sand, || {
            rng.gen_bool(probability)
        })
    }

    /// Fills every empty cell under the brush with water
    /// Despite the name this never clears a cell, it is the secondary button's tool
    pub fn erase(&self, element_grid: &mut ElementGrid, center: SignedXyVector) -> usize {
        self.apply_element(element_grid, center, ElementType::Water, || true)
    }

    /// Runs the tools selected by the pointer, painting before erasing
    pub fn apply(
        &self,
        element_grid: &mut ElementGrid,
        pointer: &PointerState,
        rng: &mut impl Rng,
    ) -> usize {
        let mut written = 0;
        if pointer.primary {
            written += self.paint(element_grid, pointer.pos, rng);
        }
        if pointer.secondary {
            written += self.erase(element_grid, pointer.pos);
        }
        if written > 0 {
            trace!("Brush wrote {} cells around {:?}", written, pointer.pos);
        }
        written
    }
}
