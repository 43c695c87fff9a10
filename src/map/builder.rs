//! Map construction and tile queries.

use std::collections::HashSet;

use bevy_ecs::resource::Resource;
use glam::{UVec2, Vec2};
use tracing::debug;

use crate::constants::{MapTile, CELL_SIZE};
use crate::error::{GameResult, MapError};
use crate::map::cell::GridCell;
use crate::map::parser::MapTileParser;

/// The island the scene takes place on: collision layer, sign markers and the player's start.
#[derive(Resource, Debug, Clone)]
pub struct Map {
    size: UVec2,
    tiles: Vec<MapTile>,
    signs: HashSet<GridCell>,
    player_start: GridCell,
}

impl Map {
    /// Creates a new `Map` from a raw board layout.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MapParse` if the layout is malformed. The start marker always
    /// parses as open ground, so a built map's start is walkable.
    pub fn new(raw_board: &[&str]) -> GameResult<Map> {
        let parsed = MapTileParser::parse_board(raw_board)?;

        let map = Map {
            size: UVec2::new(parsed.width as u32, parsed.height as u32),
            tiles: parsed.tiles,
            signs: parsed.signs.into_iter().collect(),
            player_start: parsed.player_start,
        };

        debug!(
            width = map.size.x,
            height = map.size.y,
            signs = map.signs.len(),
            start = %map.player_start,
            "Map built"
        );
        Ok(map)
    }

    /// Size of the map, in cells.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Size of the map, in world units.
    pub fn world_size(&self) -> Vec2 {
        (self.size * CELL_SIZE).as_vec2()
    }

    pub fn player_start(&self) -> GridCell {
        self.player_start
    }

    pub fn in_bounds(&self, cell: GridCell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.size.x && (cell.y as u32) < self.size.y
    }

    /// Returns the tile at `cell`.
    ///
    /// # Errors
    ///
    /// Returns `MapError::OutOfBounds` if the cell lies outside the map.
    pub fn tile(&self, cell: GridCell) -> Result<MapTile, MapError> {
        if !self.in_bounds(cell) {
            return Err(MapError::OutOfBounds(cell));
        }
        Ok(self.tiles[cell.y as usize * self.size.x as usize + cell.x as usize])
    }

    /// Whether the cell is on the collision layer. Cells outside the map count as colliding.
    pub fn collides(&self, cell: GridCell) -> bool {
        !matches!(self.tile(cell), Ok(MapTile::Open) | Ok(MapTile::Sign))
    }

    pub fn is_sign(&self, cell: GridCell) -> bool {
        self.signs.contains(&cell)
    }

    /// Whether the player can not stand on the cell: collision, signs, and anything off the map.
    pub fn is_blocked(&self, cell: GridCell) -> bool {
        !matches!(self.tile(cell), Ok(MapTile::Open))
    }

    pub fn signs(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.signs.iter().copied()
    }

    /// Iterates every cell of the map in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        let size = self.size;
        (0..size.y as i32).flat_map(move |y| (0..size.x as i32).map(move |x| GridCell::new(x, y)))
    }
}
