//! Integer grid addressing.

use std::fmt;

use glam::{IVec2, Vec2};

use crate::constants::{CELL_SIZE, SPRITE_OFFSET};
use crate::map::direction::Direction;

/// A single tile of the map, addressed by column and row.
///
/// Displays as `x,y`, the same key the map editor uses for object positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        (IVec2::from(self) + direction.as_ivec2()).into()
    }

    pub fn is_adjacent(self, other: GridCell) -> bool {
        self.manhattan_distance(other) == 1
    }

    pub fn manhattan_distance(self, other: GridCell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// World position of the top-left corner of this cell.
    pub fn origin(self) -> Vec2 {
        IVec2::from(self).as_vec2() * CELL_SIZE as f32
    }

    /// World position sprites placed on this cell are anchored at.
    pub fn anchor(self) -> Vec2 {
        self.origin() + Vec2::splat(SPRITE_OFFSET)
    }
}

impl From<IVec2> for GridCell {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<GridCell> for IVec2 {
    fn from(cell: GridCell) -> Self {
        IVec2::new(cell.x, cell.y)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
