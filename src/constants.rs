//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::UVec2;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each cell, in world units.
pub const CELL_SIZE: u32 = 32;
/// The size of the default island board, in cells.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(20, 20);

/// Distance from a cell's top-left corner to the point sprites are anchored on.
pub const SPRITE_OFFSET: f32 = 16.0;

/// Vertical correction applied to the player's position before it is mapped to a cell.
///
/// Character sprites are anchored at their feet, which sit lower than the body's visual center.
pub const PLAYER_ANCHOR_OFFSET: f32 = -8.0;

/// Movement tuning, in world units per second.
pub mod mechanics {
    /// Walking speed.
    pub const WALK_SPEED: f32 = 150.0;
    /// Running speed, used while the run modifier is held.
    pub const RUN_SPEED: f32 = 200.0;
    /// Multiplier applied to both axes when moving diagonally.
    pub const DIAGONAL_FACTOR: f32 = 0.7;
}

pub mod input {
    /// Analog stick deflection below which the stick is treated as centered.
    pub const STICK_DEAD_ZONE: f32 = 0.3;
}

pub mod forage {
    /// Number of distinct foragable kinds in the sprite sheet.
    pub const KIND_COUNT: u8 = 6;
    /// Number of foragables scattered at scene start.
    pub const INITIAL_COUNT: usize = 20;
    /// Minimum Manhattan distance between the player's start and any foragable.
    pub const INITIAL_DISTANCE: u32 = 5;
}

pub mod quest {
    /// Number of items making up a single quest.
    pub const QUEST_SIZE: usize = 5;
    /// Number of quests offered by the quest menu.
    pub const QUEST_OPTIONS: usize = 4;
    /// Number of inventory slots.
    pub const INVENTORY_CAPACITY: usize = 5;
    /// Points awarded for each collected item that satisfies the quest.
    pub const SCORE_PER_ITEM: u32 = 1000;
    /// Completion time, in seconds, at which the score decays to zero.
    pub const PAR_SECONDS: f32 = 40.0;
}

pub mod animation {
    /// Frames per second of the walking cycle.
    pub const WALK_FRAME_RATE: u8 = 10;
    /// Frames per second of the running cycle.
    pub const RUN_FRAME_RATE: u8 = 15;
    /// Number of frames in a walk cycle.
    pub const CYCLE_FRAMES: u8 = 8;
    /// Layered sprite parts of the character, back to front.
    pub const CHARACTER_PARTS: [&str; 5] = ["char", "hair", "shirt", "pants", "shoes"];
}

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    /// A walkable tile.
    Open,
    /// A tile on the collision layer (water, rocks, buildings).
    Collision,
    /// A sign marker; solid, and opens the quest menu when interacted with.
    Sign,
}

/// The raw layout of the island board, as a 2D array of characters.
///
/// `#` collision, `.` open ground, `S` sign, `X` the player's starting cell.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "####################",
    "#..................#",
    "#..##..........##..#",
    "#..##..........##..#",
    "#..X...S...........#",
    "#..........###.....#",
    "#..........###.....#",
    "#..................#",
    "#.....##...........#",
    "#.....##......##...#",
    "#.............##...#",
    "#..................#",
    "#...###............#",
    "#...###.......#....#",
    "#.............#....#",
    "#........##........#",
    "#........##....##..#",
    "#..............##..#",
    "#..................#",
    "####################",
];
