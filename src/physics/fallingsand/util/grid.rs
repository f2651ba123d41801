//! A simple 2d grid type
//! Backed by ndarray, stored row major with the first axis being y and the second axis being x.
//! The grid itself knows nothing about "up" or "down", that is handled by the element grid.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use ndarray::{Array2, ShapeError};

use super::vectors::XyVector;

/// A simple 2d grid type
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T>(Array2<T>);

/* =================
 * Initialization
 * ================= */
impl<T> Grid<T> {
    /// Create a new grid filled with one value
    pub fn new_fill(width: usize, height: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self(Array2::from_elem((height, width), value))
    }
    /// Create a new grid with the given width and height, and fill it with the given row major data
    pub fn new_from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, ShapeError> {
        Ok(Self(Array2::from_shape_vec((height, width), data)?))
    }
}

/* ======================================
 * Simple Getters
 * Access basic attributes of the struct
 * ====================================== */
impl<T> Grid<T> {
    /// Get the width of the grid
    pub fn get_width(&self) -> usize {
        self.0.ncols()
    }
    /// Get the height of the grid
    pub fn get_height(&self) -> usize {
        self.0.nrows()
    }
    /// Whether the coordinate lies inside the grid
    pub fn contains(&self, idx: XyVector) -> bool {
        idx.x < self.get_width() && idx.y < self.get_height()
    }
}

/// Defines when the user has simply exceeded the bounds of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOutOfBoundsError(pub XyVector);
impl fmt::Display for GridOutOfBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} went outside the constraints of grid", self.0)
    }
}

impl std::error::Error for GridOutOfBoundsError {}

/* ======================================
 * Position Based Getters
 * Access data at a position
 * ====================================== */
impl<T> Grid<T> {
    /// Gets the value at the given coordinate
    /// Panics if the coordinate is out of bounds
    pub fn get(&self, idx: XyVector) -> &T {
        &self.0[[idx.y, idx.x]]
    }
    /// Gets the value at the given coordinate, or returns an error if the coordinate is out of bounds
    pub fn checked_get(&self, idx: XyVector) -> Result<&T, GridOutOfBoundsError> {
        if !self.contains(idx) {
            return Err(GridOutOfBoundsError(idx));
        }
        Ok(self.get(idx))
    }
    /// Gets the value at the given coordinate, mutably
    pub fn get_mut(&mut self, idx: XyVector) -> &mut T {
        &mut self.0[[idx.y, idx.x]]
    }
    /// Sets the value at the given coordinate, overwriting the old value
    pub fn set(&mut self, idx: XyVector, value: T) {
        self.replace(idx, value);
    }
    /// Like set, but gives you ownership of the original value
    pub fn replace(&mut self, idx: XyVector, replacement: T) -> T {
        std::mem::replace(self.get_mut(idx), replacement)
    }
    /// Exchanges the values at the two coordinates
    pub fn swap(&mut self, a: XyVector, b: XyVector) {
        self.0.swap([a.y, a.x], [b.y, b.x]);
    }
}

/// Iteration
impl<T> Grid<T> {
    /// Iterate over every value, row by row starting at y = 0
    pub fn iter(&self) -> ndarray::iter::Iter<'_, T, ndarray::Ix2> {
        self.0.iter()
    }

    /// Iterate over the rows, starting at y = 0
    pub fn rows(&self) -> ndarray::iter::Lanes<'_, T, ndarray::Ix1> {
        self.0.rows()
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = &'a T;
    type IntoIter = ndarray::iter::Iter<'a, T, ndarray::Ix2>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
