//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod animation;
pub mod components;
pub mod foragable;
pub mod input;
pub mod interact;
pub mod inventory;
pub mod player;
pub mod quest;
pub mod target;

pub use self::animation::*;
pub use self::components::*;
pub use self::foragable::*;
pub use self::input::*;
pub use self::interact::*;
pub use self::inventory::*;
pub use self::player::*;
pub use self::quest::*;
pub use self::target::*;
