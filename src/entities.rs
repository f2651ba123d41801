//! This module contains all the top level resources and entities that are used in the game.

pub mod sandbox;
