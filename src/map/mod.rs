//! This module defines the game map and provides functions for interacting with it.

pub mod builder;
pub mod cell;
pub mod direction;
pub mod parser;

pub use builder::Map;
pub use cell::GridCell;
pub use direction::{Direction, Facing};
