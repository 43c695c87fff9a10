#![allow(dead_code)]

use bevy_ecs::{entity::Entity, event::Events, world::World};
use forager::{
    config::SceneConfig,
    error::GameError,
    events::{GameCommand, GameEvent},
    map::{Direction, Facing, GridCell, Map},
    systems::{
        ActionState, Bindings, Cell, Character, DebugState, DeltaTime, ForagableBundle, ForagableKind, Foragables,
        GlobalState, InputFrame, InteractionOutcome, InteractionState, Inventory, MovementModifiers, PlayerBundle,
        PlayerControlled, Position, QuestBoard, SimulationClock, TargetCell, Velocity,
    },
};
use rand::{rngs::SmallRng, SeedableRng};

/// A small enclosed board: start at (2,2), a sign at (5,2), a rock at (4,4).
pub const TEST_BOARD: [&str; 7] = [
    "##########",
    "#........#",
    "#.X..S...#",
    "#........#",
    "#...#....#",
    "#........#",
    "##########",
];

pub fn create_test_map() -> Map {
    Map::new(&TEST_BOARD).expect("Failed to create test map")
}

pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// A world with every resource the gameplay systems read, but no entities.
pub fn create_test_world() -> World {
    let mut world = World::new();

    world.insert_resource(Events::<GameEvent>::default());
    world.insert_resource(Events::<GameError>::default());
    world.insert_resource(Events::<InteractionOutcome>::default());
    world.insert_resource(SceneConfig::default());
    world.insert_resource(create_test_map());
    world.insert_resource(Foragables::default());
    world.insert_resource(Inventory::new(5));
    world.insert_resource(InteractionState::default());
    world.insert_resource(QuestBoard::from_kinds(&[]));
    world.insert_resource(SimulationClock::default());
    world.insert_resource(DeltaTime { seconds: 1.0 / 60.0 });
    world.insert_resource(ActionState::default());
    world.insert_resource(Bindings::default());
    world.insert_resource(InputFrame::default());
    world.insert_resource(GlobalState { exit: false });
    world.insert_resource(DebugState::default());

    world
}

/// Spawns the player standing in `cell`, facing right.
pub fn spawn_test_player(world: &mut World, cell: GridCell) -> Entity {
    world
        .spawn(PlayerBundle {
            player: PlayerControlled,
            position: Position(cell.anchor()),
            velocity: Velocity::default(),
            facing: Facing::Right,
            target: TargetCell(cell.step(Direction::Right)),
            modifiers: MovementModifiers::default(),
            character: Character::default(),
        })
        .id()
}

/// Spawns a foragable and registers it in the [`Foragables`] lookup.
pub fn spawn_test_foragable(world: &mut World, cell: GridCell, kind: u8) -> Entity {
    let kind = ForagableKind(kind);
    let entity = world
        .spawn(ForagableBundle {
            kind,
            cell: Cell(cell),
            position: Position(cell.anchor()),
        })
        .id();
    world.resource_mut::<Foragables>().insert(cell, entity, kind);
    entity
}

pub fn set_target(world: &mut World, player: Entity, cell: GridCell) {
    world.entity_mut(player).insert(TargetCell(cell));
}

pub fn send_command(world: &mut World, command: GameCommand) {
    world.send_event(GameEvent::Command(command));
}

/// Every interaction outcome currently buffered, oldest first.
pub fn outcomes(world: &World) -> Vec<InteractionOutcome> {
    world
        .resource::<Events<InteractionOutcome>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

pub fn kinds(values: &[u8]) -> Vec<ForagableKind> {
    values.iter().copied().map(ForagableKind).collect()
}
