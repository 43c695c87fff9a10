//! Forager game library crate.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod map;
pub mod systems;
