//! Falling sand physics engine.
//! A 2d cellular automaton of sand and water, stepped at a fixed rate.

pub mod brush;
pub mod data;
pub mod elements;
pub mod simulation;
pub mod util;
