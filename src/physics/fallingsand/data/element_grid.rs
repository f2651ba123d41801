use bevy::log::trace;
use hashbrown::HashMap;
use itertools::Either;
use rayon::prelude::*;

use crate::physics::fallingsand::elements::element::ElementType;
use crate::physics::fallingsand::elements::movement::{candidate_moves, Move};
use crate::physics::fallingsand::util::grid::Grid;
use crate::physics::fallingsand::util::image::{RawImage, BYTES_PER_PIXEL};
use crate::physics::fallingsand::util::vectors::{SignedXyVector, XyVector};

/// A handle to one cell of an [ElementGrid]
/// Only the grid hands these out, so holding one means the position was in bounds
/// when it was created. It does not borrow the grid, so it must not outlive a
/// change of the grid's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pos: XyVector,
}

/// An element grid is a 2D grid of elements plus the tick counter driving it
#[derive(Clone, Debug)]
pub struct ElementGrid {
    grid: Grid<ElementType>,
    tick: u64,

    /// The tick on which each cell last received a moving element
    /// Bookkeeping only, not part of the world state
    last_moved: Grid<u64>,
}

/// Two worlds are equal when they hold the same cells at the same tick
impl PartialEq for ElementGrid {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.grid == other.grid
    }
}

/* Initialization */
impl ElementGrid {
    /// Creates a new element grid filled with [ElementType::Empty]
    pub fn new_empty(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, ElementType::Empty)
    }

    /// Creates a new element grid filled with the given element
    pub fn new_filled(width: usize, height: usize, fill: ElementType) -> Self {
        debug_assert!(width > 0 && height > 0, "Grid dimensions must be positive");
        Self {
            grid: Grid::new_fill(width, height, fill),
            tick: 0,
            last_moved: Grid::new_fill(width, height, 0),
        }
    }

    /// Wraps an already populated grid, used when restoring a snapshot
    pub fn from_parts(grid: Grid<ElementType>, tick: u64) -> Self {
        let last_moved = Grid::new_fill(grid.get_width(), grid.get_height(), 0);
        Self {
            grid,
            tick,
            last_moved,
        }
    }
}

/* Getters */
impl ElementGrid {
    pub fn get_width(&self) -> usize {
        self.grid.get_width()
    }
    pub fn get_height(&self) -> usize {
        self.grid.get_height()
    }
    pub fn get_tick(&self) -> u64 {
        self.tick
    }
    pub fn get_grid(&self) -> &Grid<ElementType> {
        &self.grid
    }

    /// Counts how many cells hold each element
    pub fn element_counts(&self) -> HashMap<ElementType, usize> {
        let mut out = HashMap::new();
        for element in self.grid.iter() {
            *out.entry(*element).or_insert(0) += 1;
        }
        out
    }
}

/// Cell access
impl ElementGrid {
    /// Gets a handle to the cell, or None if it lies outside the grid
    pub fn get(&self, x: i64, y: i64) -> Option<CellRef> {
        self.checked_ref(SignedXyVector::new(x, y).to_xy_vector()?)
    }

    /// Gets a handle to the cell without checking bounds
    /// Reading or writing through it panics if the caller got the bounds wrong
    pub fn get_unchecked(&self, x: usize, y: usize) -> CellRef {
        debug_assert!(self.grid.contains(XyVector { x, y }));
        CellRef {
            pos: XyVector { x, y },
        }
    }

    /// Like [ElementGrid::get] but for a position already known to be non negative
    pub fn checked_ref(&self, pos: XyVector) -> Option<CellRef> {
        self.grid.checked_get(pos).ok().map(|_| CellRef { pos })
    }

    /// Gets the neighbor of a cell in the direction of the move, if it is inside the grid
    pub fn shifted(&self, cell: CellRef, mv: Move) -> Option<CellRef> {
        let pos = cell.pos.checked_offset(mv.offset())?;
        self.checked_ref(pos)
    }

    pub fn read(&self, cell: CellRef) -> ElementType {
        *self.grid.get(cell.pos)
    }

    pub fn write(&mut self, cell: CellRef, element: ElementType) {
        self.grid.set(cell.pos, element);
    }

    pub fn is_empty(&self, cell: CellRef) -> bool {
        self.read(cell).is_empty()
    }

    /// Exchanges the contents of the two cells
    pub fn swap(&mut self, a: CellRef, b: CellRef) {
        self.grid.swap(a.pos, b.pos);
    }
}

/// Handle processing
impl ElementGrid {
    /// Do one tick of movement over the whole grid
    /// Every cell is visited exactly once and an element moves at most once per tick.
    /// Rows alternate their scan direction by `(tick + y) % 2`, and mirrored
    /// move pairs alternate their preference by `tick % 2`.
    pub fn process(&mut self) {
        self.tick += 1;
        let move_parity = self.tick % 2;
        let width = self.get_width();
        let mut moved = 0usize;

        for y in 0..self.get_height() {
            let row_parity = (self.tick + y as u64) % 2;
            let xs = if row_parity == 0 {
                Either::Left(0..width)
            } else {
                Either::Right((0..width).rev())
            };
            for x in xs {
                let cell = self.get_unchecked(x, y);
                if self.process_cell(cell, move_parity) {
                    moved += 1;
                }
            }
        }
        trace!("Tick {} moved {} cells", self.tick, moved);
    }

    /// Tries the element's moves in priority order and swaps with the first empty destination
    /// Returns whether the element moved
    fn process_cell(&mut self, cell: CellRef, move_parity: u64) -> bool {
        if *self.last_moved.get(cell.pos) == self.tick {
            return false;
        }
        let Some(moves) = self.read(cell).get_moves() else {
            return false;
        };
        let destination = candidate_moves(moves, move_parity)
            .filter_map(|mv| self.shifted(cell, mv))
            .find(|target| self.is_empty(*target));
        match destination {
            Some(target) => {
                self.swap(cell, target);
                self.last_moved.set(target.pos, self.tick);
                true
            }
            None => false,
        }
    }
}

/* Drawing */
impl ElementGrid {
    /// Draw the texture as the color of each element
    /// The top row of the world (y = height - 1) is the first row of the image
    pub fn get_texture(&self) -> RawImage {
        let width = self.get_width();
        let height = self.get_height();
        let mut pixels = vec![0; width * height * BYTES_PER_PIXEL];
        pixels
            .par_chunks_mut(width * BYTES_PER_PIXEL)
            .enumerate()
            .for_each(|(row, out)| {
                let y = height - 1 - row;
                for (x, pixel) in out.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                    let color = self.grid.get(XyVector { x, y }).get_color().as_rgba_u8();
                    pixel.copy_from_slice(&color);
                }
            });
        RawImage {
            width,
            height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a grid from rows written top row first, which is how they read in the source
    /// `.` is empty, `s` is sand, `w` is water
    fn grid_from_ascii(rows: &[&str], tick: u64) -> ElementGrid {
        let height = rows.len();
        let width = rows[0].len();
        let mut out = ElementGrid::new_empty(width, height);
        out.tick = tick;
        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row;
            for (x, c) in line.chars().enumerate() {
                let element = match c {
                    '.' => ElementType::Empty,
                    's' => ElementType::Sand,
                    'w' => ElementType::Water,
                    _ => panic!("Unknown cell {}", c),
                };
                out.write(out.get_unchecked(x, y), element);
            }
        }
        out
    }

    /// The opposite of [grid_from_ascii]
    fn grid_to_ascii(grid: &ElementGrid) -> Vec<String> {
        (0..grid.get_height())
            .rev()
            .map(|y| {
                (0..grid.get_width())
                    .map(|x| match grid.read(grid.get_unchecked(x, y)) {
                        ElementType::Empty => '.',
                        ElementType::Sand => 's',
                        ElementType::Water => 'w',
                    })
                    .collect()
            })
            .collect()
    }

    mod cell_access {
        use super::*;

        #[test]
        fn test_get_in_bounds() {
            let grid = ElementGrid::new_empty(3, 2);
            assert!(grid.get(0, 0).is_some());
            assert!(grid.get(2, 1).is_some());
        }

        #[test]
        fn test_get_out_of_bounds() {
            let grid = ElementGrid::new_empty(3, 2);
            assert_eq!(grid.get(-1, 0), None);
            assert_eq!(grid.get(0, -1), None);
            assert_eq!(grid.get(3, 0), None);
            assert_eq!(grid.get(0, 2), None);
        }

        #[test]
        fn test_read_write() {
            let mut grid = ElementGrid::new_empty(3, 2);
            let cell = grid.get(1, 1).unwrap();
            assert_eq!(grid.read(cell), ElementType::Empty);
            grid.write(cell, ElementType::Water);
            assert_eq!(grid.read(cell), ElementType::Water);
            assert_eq!(grid.get_grid().get(XyVector::new(1, 1)), &ElementType::Water);
        }

        #[test]
        fn test_swap() {
            let mut grid = ElementGrid::new_empty(2, 1);
            let a = grid.get_unchecked(0, 0);
            let b = grid.get_unchecked(1, 0);
            grid.write(a, ElementType::Sand);
            grid.swap(a, b);
            assert_eq!(grid.read(a), ElementType::Empty);
            assert_eq!(grid.read(b), ElementType::Sand);
        }

        #[test]
        fn test_shifted_at_edges() {
            let grid = ElementGrid::new_empty(2, 2);
            let corner = grid.get_unchecked(0, 0);
            assert_eq!(grid.shifted(corner, Move::Down), None);
            assert_eq!(grid.shifted(corner, Move::Left), None);
            assert_eq!(
                grid.shifted(corner, Move::Right),
                Some(grid.get_unchecked(1, 0))
            );
            let top_right = grid.get_unchecked(1, 1);
            assert_eq!(grid.shifted(top_right, Move::Right), None);
            assert_eq!(
                grid.shifted(top_right, Move::DownLeft),
                Some(grid.get_unchecked(0, 0))
            );
        }

        #[test]
        fn test_new_grid_is_fully_empty() {
            let grid = ElementGrid::new_empty(4, 3);
            assert_eq!(grid.get_tick(), 0);
            let counts = grid.element_counts();
            assert_eq!(counts.get(&ElementType::Empty), Some(&12));
            assert_eq!(counts.len(), 1);
        }
    }

    mod falls_down {
        use super::*;

        #[test]
        fn test_three_by_three_scenario() {
            let mut grid = grid_from_ascii(&[".s.", "...", "..."], 0);
            grid.process();
            assert_eq!(grid.get_tick(), 1);
            assert_eq!(grid_to_ascii(&grid), vec!["...", ".s.", "..."]);
            grid.process();
            assert_eq!(grid.get_tick(), 2);
            assert_eq!(grid_to_ascii(&grid), vec!["...", "...", ".s."]);
        }

        #[test]
        fn test_moves_exactly_one_cell_per_tick() {
            let mut grid = grid_from_ascii(&["s", ".", ".", "."], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec![".", "s", ".", "."]);
        }

        #[test]
        fn test_bottom_row_never_moves() {
            let mut grid = grid_from_ascii(&["s"], 0);
            for _ in 0..10 {
                grid.process();
            }
            assert_eq!(grid_to_ascii(&grid), vec!["s"]);
            assert_eq!(grid.get_tick(), 10);
        }

        #[test]
        fn test_sand_rests_on_full_row() {
            let mut grid = grid_from_ascii(&[".s.", "sss"], 0);
            for _ in 0..4 {
                grid.process();
            }
            assert_eq!(grid_to_ascii(&grid), vec![".s.", "sss"]);
        }

        #[test]
        fn test_sand_does_not_move_sideways() {
            let mut grid = grid_from_ascii(&["..s..", "sssss"], 0);
            grid.process();
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["..s..", "sssss"]);
        }
    }

    mod diagonal {
        use super::*;

        #[test]
        fn test_odd_tick_prefers_down_right() {
            // tick 0 becomes tick 1 inside process, parity 1
            let mut grid = grid_from_ascii(&[".s.", ".s."], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["...", ".ss"]);
        }

        #[test]
        fn test_even_tick_prefers_down_left() {
            let mut grid = grid_from_ascii(&[".s.", ".s."], 1);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["...", "ss."]);
        }

        #[test]
        fn test_falls_back_to_other_diagonal() {
            let mut grid = grid_from_ascii(&[".s.", ".ss"], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["...", "sss"]);

            let mut grid = grid_from_ascii(&[".s.", "ss."], 1);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["...", "sss"]);
        }

        #[test]
        fn test_alternates_between_consecutive_ticks() {
            let mut odd = grid_from_ascii(&[".s.", ".s."], 0);
            let mut even = grid_from_ascii(&[".s.", ".s."], 1);
            odd.process();
            even.process();
            assert_ne!(grid_to_ascii(&odd), grid_to_ascii(&even));
        }
    }

    mod lateral {
        use super::*;

        #[test]
        fn test_water_flows_right_on_odd_tick() {
            let mut grid = grid_from_ascii(&[".w.", "sss"], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["..w", "sss"]);
        }

        #[test]
        fn test_water_flows_left_on_even_tick() {
            let mut grid = grid_from_ascii(&[".w.", "sss"], 1);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["w..", "sss"]);
        }

        #[test]
        fn test_water_prefers_diagonal_over_lateral() {
            let mut grid = grid_from_ascii(&[".w.", "ss."], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["...", "ssw"]);
        }

        #[test]
        fn test_water_blocked_everywhere_stays() {
            let mut grid = grid_from_ascii(&["sws", "sss"], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["sws", "sss"]);
        }
    }

    mod scan_order {
        use super::*;

        #[test]
        fn test_no_cell_moves_twice() {
            // On tick 1 the top row scans left to right while water prefers moving
            // right, so it lands on the next cell to be visited.
            let mut grid = grid_from_ascii(&["w....", "sssss"], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec![".w...", "sssss"]);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["w....", "sssss"]);
        }

        #[test]
        fn test_falling_column_moves_one_step() {
            let mut grid = grid_from_ascii(&["s", "s", ".", "."], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec![".", "s", "s", "."]);
        }

        #[test]
        fn test_row_direction_decides_contested_cell() {
            // Both sands want the empty center below them. The top row scans
            // left to right on tick 1, so the left sand gets there first.
            let mut grid = grid_from_ascii(&["s.s", "s.s"], 0);
            grid.process();
            assert_eq!(grid_to_ascii(&grid), vec!["..s", "sss"]);
        }
    }

    mod conservation {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        use strum::IntoEnumIterator;

        use super::*;

        #[test]
        fn test_counts_are_preserved() {
            let mut rng = StdRng::seed_from_u64(7);
            let mut grid = ElementGrid::new_empty(24, 18);
            for y in 0..18 {
                for x in 0..24 {
                    let element = match rng.gen_range(0..3) {
                        0 => ElementType::Empty,
                        1 => ElementType::Sand,
                        _ => ElementType::Water,
                    };
                    grid.write(grid.get_unchecked(x, y), element);
                }
            }
            let before = grid.element_counts();
            for _ in 0..50 {
                grid.process();
                let after = grid.element_counts();
                for element in ElementType::iter() {
                    assert_eq!(before.get(&element), after.get(&element));
                }
            }
        }

        #[test]
        fn test_everything_settles_to_the_bottom() {
            let mut grid = grid_from_ascii(&["sss", "...", "...", "..."], 0);
            for _ in 0..10 {
                grid.process();
            }
            assert_eq!(grid_to_ascii(&grid), vec!["...", "...", "...", "sss"]);
        }
    }

    mod texture {
        use super::*;

        #[test]
        fn test_texture_size() {
            let grid = ElementGrid::new_empty(5, 3);
            let texture = grid.get_texture();
            assert_eq!(texture.width, 5);
            assert_eq!(texture.height, 3);
            assert_eq!(texture.pixels.len(), 4 * 5 * 3);
        }

        #[test]
        fn test_texture_is_top_row_first() {
            let grid = grid_from_ascii(&["s.", ".w"], 0);
            let texture = grid.get_texture();
            assert_eq!(texture.get_pixel(0, 0), [255, 0, 255, 255]);
            assert_eq!(texture.get_pixel(1, 0), [0, 0, 0, 255]);
            assert_eq!(texture.get_pixel(0, 1), [0, 0, 0, 255]);
            assert_eq!(texture.get_pixel(1, 1), [0, 255, 255, 255]);
        }

        #[test]
        fn test_texture_does_not_mutate() {
            let grid = grid_from_ascii(&["s.", ".w"], 3);
            let before = grid.clone();
            let _ = grid.get_texture();
            assert_eq!(grid, before);
        }
    }
}
