//! Tracking of the cell in front of the player.

use bevy_ecs::{query::With, system::Query};
use glam::Vec2;
use tracing::trace;

use crate::constants::{CELL_SIZE, PLAYER_ANCHOR_OFFSET};
use crate::map::{Direction, GridCell};
use crate::systems::components::{PlayerControlled, Position, TargetCell, Velocity};

/// Maps the player's anchor position to the cell their body occupies.
pub fn world_to_cell(position: Vec2) -> GridCell {
    let corrected = position + Vec2::new(0.0, PLAYER_ANCHOR_OFFSET);
    (corrected / CELL_SIZE as f32).floor().as_ivec2().into()
}

/// The direction of the movement that decides the target, if any.
///
/// Horizontal movement wins whenever it is nonzero; vertical only applies once horizontal is exactly zero.
pub fn facing_direction(velocity: Vec2) -> Option<Direction> {
    if velocity.x < 0.0 {
        Some(Direction::Left)
    } else if velocity.x > 0.0 {
        Some(Direction::Right)
    } else if velocity.y < 0.0 {
        Some(Direction::Up)
    } else if velocity.y > 0.0 {
        Some(Direction::Down)
    } else {
        None
    }
}

/// Recomputes the target from the position and the velocity just applied.
///
/// With zero velocity the previous target is kept, so the player keeps facing where they last moved.
pub fn track_target(current: GridCell, position: Vec2, velocity: Vec2) -> GridCell {
    match facing_direction(velocity) {
        Some(direction) => world_to_cell(position).step(direction),
        None => current,
    }
}

pub fn target_system(mut players: Query<(&Position, &Velocity, &mut TargetCell), With<PlayerControlled>>) {
    for (position, velocity, mut target) in players.iter_mut() {
        let next = track_target(target.0, position.0, velocity.0);
        if next != target.0 {
            trace!(from = %target.0, to = %next, "Target cell moved");
            target.0 = next;
        }
    }
}
