//! Centralized error types for the game.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use bevy_ecs::event::Event;

use crate::map::GridCell;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
/// Systems report it as an event when they hit a state they cannot act on.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0}")]
    UnknownCharacter(char),
    #[error("Board has no rows")]
    EmptyBoard,
    #[error("Invalid board width at line {line}: expected {expected}, got {found}")]
    RaggedRow { line: usize, expected: usize, found: usize },
    #[error("Board must have exactly one player start, found {0}")]
    InvalidStartCount(usize),
}

/// Errors related to map queries and validation.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Cell {0} is outside the map")]
    OutOfBounds(GridCell),
}

/// Errors raised while scattering foragables.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Cannot place {requested} foragables: only {available} eligible cells")]
    InsufficientSpace { requested: usize, available: usize },
}

/// Errors raised while loading or validating the scene configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
