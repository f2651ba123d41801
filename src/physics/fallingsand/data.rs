//! The data module contains the data structures for the falling sand physics engine.
//! These are where the actual grid of elements is stored, and how it is persisted.

pub mod element_grid;
pub mod snapshot;
