use bevy_ecs::{
    event::{EventReader, EventWriter},
    query::With,
    system::{Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, info};

use crate::{
    config::SceneConfig,
    constants::{mechanics::DIAGONAL_FACTOR, CELL_SIZE},
    error::GameError,
    events::{GameCommand, GameEvent},
    map::{Facing, GridCell, Map},
    systems::{
        components::{DebugState, DeltaTime, GlobalState, MovementModifiers, PlayerControlled, Position, Velocity},
        foragable::Foragables,
        input::{ActionState, Actions},
        interact::InteractionState,
        target::world_to_cell,
    },
};

/// Keeps the player strictly inside the map's world rectangle.
const BOUNDS_MARGIN: f32 = 0.01;
/// Longest single move checked against the map; shorter than a cell so none can be skipped.
const MAX_SUBSTEP: f32 = CELL_SIZE as f32 / 2.0;

/// Velocity and facing produced by the held actions.
///
/// Left beats right and up beats down when both are held. Diagonal movement is damped so it
/// covers roughly the same distance as straight movement. Facing only changes on horizontal input.
pub fn velocity_from_actions(actions: Actions, walk_speed: f32, run_speed: f32) -> (Vec2, Option<Facing>) {
    let speed = if actions.contains(Actions::RUN) { run_speed } else { walk_speed };
    let mut velocity = Vec2::ZERO;
    let mut facing = None;

    if actions.contains(Actions::LEFT) {
        velocity.x = -speed;
        facing = Some(Facing::Left);
    } else if actions.contains(Actions::RIGHT) {
        velocity.x = speed;
        facing = Some(Facing::Right);
    }

    if actions.contains(Actions::UP) {
        velocity.y = -speed;
    } else if actions.contains(Actions::DOWN) {
        velocity.y = speed;
    }

    if velocity.x != 0.0 && velocity.y != 0.0 {
        velocity *= DIAGONAL_FACTOR;
    }

    (velocity, facing)
}

/// Advances `position` by `velocity * dt`, one axis at a time, in sub-steps of at most
/// `MAX_SUBSTEP`. Each axis stops at the last position before a solid cell, so no step can
/// pass through a wall. The result is clamped to `[0, bounds)`.
pub fn step_position(position: Vec2, velocity: Vec2, dt: f32, bounds: Vec2, solid: impl Fn(GridCell) -> bool) -> Vec2 {
    let mut next = position;

    for delta in [Vec2::new(velocity.x * dt, 0.0), Vec2::new(0.0, velocity.y * dt)] {
        let distance = delta.length();
        if distance == 0.0 || !distance.is_finite() {
            continue;
        }

        let steps = (distance / MAX_SUBSTEP).ceil() as u32;
        let step = delta / steps as f32;
        for _ in 0..steps {
            let candidate = next + step;
            if solid(world_to_cell(candidate)) {
                break;
            }
            next = candidate;
        }
    }

    next.clamp(Vec2::ZERO, bounds - Vec2::splat(BOUNDS_MARGIN))
}

/// Turns held actions into the player's velocity, facing and run state.
///
/// Movement is suppressed while a menu or summary is on screen.
pub fn player_control_system(
    actions: Res<ActionState>,
    config: Res<SceneConfig>,
    interaction: Res<InteractionState>,
    mut players: Query<(&mut Velocity, &mut Facing, &mut MovementModifiers), With<PlayerControlled>>,
    mut errors: EventWriter<GameError>,
) {
    let (mut velocity, mut facing, mut modifiers) = match players.single_mut() {
        Ok(tuple) => tuple,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for player system: {}",
                e
            )));
            return;
        }
    };

    if interaction.blocks_movement() {
        velocity.0 = Vec2::ZERO;
        modifiers.running = false;
        return;
    }

    let (next_velocity, next_facing) = velocity_from_actions(actions.held(), config.walk_speed, config.run_speed);
    velocity.0 = next_velocity;
    modifiers.running = actions.is_held(Actions::RUN);
    if let Some(next_facing) = next_facing {
        if *facing != next_facing {
            debug!(facing = next_facing.as_ref(), "Player turned");
            *facing = next_facing;
        }
    }
}

/// Moves the player, colliding with the collision layer, signs and foragables.
pub fn player_movement_system(
    map: Res<Map>,
    foragables: Res<Foragables>,
    delta_time: Res<DeltaTime>,
    mut players: Query<(&mut Position, &Velocity), With<PlayerControlled>>,
) {
    let bounds = map.world_size();
    for (mut position, velocity) in players.iter_mut() {
        if velocity.0 == Vec2::ZERO {
            continue;
        }
        position.0 = step_position(position.0, velocity.0, delta_time.seconds, bounds, |cell| {
            map.is_blocked(cell) || foragables.contains(cell)
        });
    }
}

/// Handles commands that act on the game as a whole rather than the scene.
pub fn control_system(
    mut events: EventReader<GameEvent>,
    mut state: ResMut<GlobalState>,
    mut debug_state: ResMut<DebugState>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = event;
        match command {
            GameCommand::Exit => {
                info!("Exit requested");
                state.exit = true;
            }
            GameCommand::ToggleDebug => {
                debug_state.enabled = !debug_state.enabled;
                info!("Debug grid {}", if debug_state.enabled { "shown" } else { "hidden" });
            }
            _ => {}
        }
    }
}
