//! Saving and loading the world
//! A snapshot is a plain value copy of an [ElementGrid] that can be written to disk as json.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fs;
use std::path::Path;

use bevy::log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::physics::fallingsand::data::element_grid::ElementGrid;
use crate::physics::fallingsand::elements::element::ElementType;
use crate::physics::fallingsand::util::grid::Grid;

/// The schema version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything that can go wrong turning a persisted record back into a world
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file could not be read or written
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    /// The record is not valid json, or holds an unknown element
    #[error("snapshot is not a valid record: {0}")]
    Json(#[from] serde_json::Error),
    /// Written by a schema this build does not understand
    #[error("unsupported snapshot version {found}, expected {}", SNAPSHOT_VERSION)]
    UnsupportedVersion {
        /// The version found in the record
        found: u32,
    },
    /// Width or height is zero
    #[error("snapshot dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// The recorded width
        width: usize,
        /// The recorded height
        height: usize,
    },
    /// The number of rows does not match the height
    #[error("snapshot has {found} rows but a height of {height}")]
    RowCountMismatch {
        /// The recorded height
        height: usize,
        /// The number of rows actually present
        found: usize,
    },
    /// One of the rows does not match the width
    #[error("snapshot row {row} has {found} cells but a width of {width}")]
    RowLengthMismatch {
        /// The index of the offending row, counting from y = 0
        row: usize,
        /// The recorded width
        width: usize,
        /// The number of cells actually present in the row
        found: usize,
    },
    /// The cells could not be arranged into a grid
    #[error("snapshot cells do not fit the grid: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// A value copy of the world, independent of the live grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version, see [SNAPSHOT_VERSION]
    pub version: u32,
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// One row per y starting at y = 0, each holding one element per x
    pub cells: Vec<Vec<ElementType>>,
    /// The tick counter at the time of the save
    pub tick: u64,
}

impl Snapshot {
    /// Copies the state of the world
    pub fn from_grid(element_grid: &ElementGrid) -> Self {
        let cells = element_grid
            .get_grid()
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect();
        Self {
            version: SNAPSHOT_VERSION,
            width: element_grid.get_width(),
            height: element_grid.get_height(),
            cells,
            tick: element_grid.get_tick(),
        }
    }

    /// Checks the record is structurally sound without building anything
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(SnapshotError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.cells.len() != self.height {
            return Err(SnapshotError::RowCountMismatch {
                height: self.height,
                found: self.cells.len(),
            });
        }
        if let Some((row, cells)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != self.width)
        {
            return Err(SnapshotError::RowLengthMismatch {
                row,
                width: self.width,
                found: cells.len(),
            });
        }
        Ok(())
    }

    /// Builds a new world from the record, failing before anything is built if it is malformed
    pub fn into_grid(self) -> Result<ElementGrid, SnapshotError> {
        self.validate()?;
        let data: Vec<ElementType> = self.cells.into_iter().flatten().collect();
        let grid = Grid::new_from_vec(self.width, self.height, data)?;
        Ok(ElementGrid::from_parts(grid, self.tick))
    }

    /// Serializes the record to json
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a record from json, without validating its structure
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the record to a file, creating parent directories as needed
    pub fn save_to_path(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!(
            "Saved {}x{} world at tick {} to {:?}",
            self.width, self.height, self.tick, path
        );
        Ok(())
    }

    /// Reads a record from a file
    pub fn load_from_path(path: &Path) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path)?;
        let out = Self::from_json(&json)?;
        debug!("Read snapshot from {:?}", path);
        Ok(out)
    }
}
