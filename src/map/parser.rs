//! Map parsing functionality for converting raw board layouts into structured data.

use crate::constants::MapTile;
use crate::error::ParseError;
use crate::map::cell::GridCell;

/// Structured representation of a parsed ASCII board with its special positions extracted.
#[derive(Debug)]
pub struct ParsedMap {
    pub width: usize,
    pub height: usize,
    /// Row-major tiles, `width * height` long.
    pub tiles: Vec<MapTile>,
    /// Sign markers, in reading order.
    pub signs: Vec<GridCell>,
    /// Starting cell of the player (marked by `X` in the layout).
    pub player_start: GridCell,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Converts an ASCII character from the board layout into its tile type.
    ///
    /// The start marker (`X`) becomes open ground; its position is tracked separately.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnknownCharacter` for any character outside the board vocabulary.
    pub fn parse_character(c: char) -> Result<MapTile, ParseError> {
        match c {
            '#' => Ok(MapTile::Collision),
            '.' => Ok(MapTile::Open),
            'X' => Ok(MapTile::Open),
            'S' => Ok(MapTile::Sign),
            _ => Err(ParseError::UnknownCharacter(c)),
        }
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, rows differ in width, a character is unknown,
    /// or the board does not contain exactly one player start.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let height = raw_board.len();
        let width = raw_board.first().map(|line| line.chars().count()).ok_or(ParseError::EmptyBoard)?;
        if width == 0 {
            return Err(ParseError::EmptyBoard);
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut signs = Vec::new();
        let mut starts = Vec::new();

        for (y, line) in raw_board.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    line: y,
                    expected: width,
                    found,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let tile = Self::parse_character(character)?;
                let cell = GridCell::new(x as i32, y as i32);

                match character {
                    'S' => signs.push(cell),
                    'X' => starts.push(cell),
                    _ => {}
                }

                tiles.push(tile);
            }
        }

        let player_start = match starts.as_slice() {
            [start] => *start,
            _ => return Err(ParseError::InvalidStartCount(starts.len())),
        };

        Ok(ParsedMap {
            width,
            height,
            tiles,
            signs,
            player_start,
        })
    }
}
