use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;

use crate::map::{Facing, GridCell};
use crate::systems::animation::Character;
use crate::systems::foragable::ForagableKind;

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// World position of an entity's anchor point.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// Velocity applied during the current tick, in world units per second.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// The cell the player is facing and interacting with.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCell(pub GridCell);

/// The grid cell a static entity occupies. Never changes after spawning.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(pub GridCell);

/// Per-tick movement state derived from input.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementModifiers {
    pub running: bool,
}

/// Time elapsed since the last tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime {
    pub seconds: f32,
}

/// Simulation time accumulated from every tick's delta.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    pub seconds: f64,
    pub ticks: u64,
}

impl SimulationClock {
    pub fn advance(&mut self, dt: f32) {
        self.seconds += dt as f64;
        self.ticks += 1;
    }
}

#[derive(Resource, Debug, Default)]
pub struct GlobalState {
    pub exit: bool,
}

/// Whether the host should draw the debug grid overlay with cell labels.
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    pub enabled: bool,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub velocity: Velocity,
    pub facing: Facing,
    pub target: TargetCell,
    pub modifiers: MovementModifiers,
    pub character: Character,
}

#[derive(Bundle)]
pub struct ForagableBundle {
    pub kind: ForagableKind,
    pub cell: Cell,
    pub position: Position,
}
