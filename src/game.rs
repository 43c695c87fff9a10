//! This module contains the main game logic and state.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::config::SceneConfig;
use crate::constants::RAW_BOARD;
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;
use crate::formatter;
use crate::map::{Direction, Facing, GridCell, Map};
use crate::systems::{
    self, ActionState, Bindings, Character, DebugState, DeltaTime, Foragables, GlobalState, InputFrame,
    InteractionOutcome, InteractionState, Inventory, MovementModifiers, PlayerBundle, PlayerControlled, Position,
    QuestBoard, SimulationClock, TargetCell, Velocity,
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Turns the input frame into actions and commands
    Input,
    /// Moves the player and retargets
    Update,
    /// Reacts to commands against the updated target
    Respond,
    Animation,
}

/// The foraging scene: an ECS world holding the map, the player and the foragables,
/// plus the schedule that advances it one tick at a time.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    /// Interaction outcomes produced by the most recent tick.
    outcomes: Vec<InteractionOutcome>,
}

impl Game {
    /// Builds the default island scene.
    ///
    /// Placement is seeded from `config.seed` when set, so a seeded scene is reproducible.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the configuration is invalid or the board cannot fit the requested foragables.
    pub fn new(config: SceneConfig) -> GameResult<Game> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self::with_board(config, &RAW_BOARD, &mut rng)
    }

    /// Builds a scene on an arbitrary board, drawing placement randomness from `rng`.
    pub fn with_board<R: Rng + ?Sized>(config: SceneConfig, board: &[&str], rng: &mut R) -> GameResult<Game> {
        info!("Starting scene initialization");
        let config = config.validate()?;

        debug!("Parsing board");
        let map = Map::new(board)?;
        let start = map.player_start();

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, map, config);
        Self::configure_schedule(&mut schedule);

        debug!(%start, "Spawning player");
        world.spawn(PlayerBundle {
            player: PlayerControlled,
            position: Position(start.anchor()),
            velocity: Velocity::default(),
            facing: Facing::Right,
            target: TargetCell(start.step(Direction::Right)),
            modifiers: MovementModifiers::default(),
            character: Character::default(),
        });

        systems::spawn_foragables(&mut world, rng)?;
        let board = QuestBoard::from_kinds(&world.resource::<Foragables>().kinds_in_cell_order());
        world.insert_resource(board);

        info!("Scene initialization completed successfully");
        Ok(Game {
            world,
            schedule,
            outcomes: Vec::new(),
        })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<InteractionOutcome>(world);
    }

    fn insert_resources(world: &mut World, map: Map, config: SceneConfig) {
        world.insert_resource(Inventory::new(config.inventory_capacity));
        world.insert_resource(map);
        world.insert_resource(config);
        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(DebugState::default());
        world.insert_resource(Bindings::default());
        world.insert_resource(InputFrame::default());
        world.insert_resource(ActionState::default());
        world.insert_resource(DeltaTime::default());
        world.insert_resource(SimulationClock::default());
        world.insert_resource(InteractionState::default());
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                (systems::input_system, systems::control_system)
                    .chain()
                    .in_set(GameplaySet::Input),
                (
                    systems::player_control_system,
                    systems::player_movement_system,
                    systems::target_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                systems::interaction_system.in_set(GameplaySet::Respond),
                systems::character_animation_system.in_set(GameplaySet::Animation),
            ))
            .configure_sets(
                (
                    GameplaySet::Input,
                    GameplaySet::Update,
                    GameplaySet::Respond,
                    GameplaySet::Animation,
                )
                    .chain(),
            );
    }

    /// Advances the scene by one tick using the devices' state for this frame.
    ///
    /// # Returns
    ///
    /// `true` if the game should terminate (exit command received), `false` to continue
    pub fn tick(&mut self, dt: f32, input: InputFrame) -> bool {
        self.world.insert_resource(DeltaTime { seconds: dt });
        self.world.insert_resource(input);
        self.world.resource_mut::<SimulationClock>().advance(dt);

        self.schedule.run(&mut self.world);
        formatter::increment_tick();

        for error in self.world.resource_mut::<Events<GameError>>().drain() {
            warn!(error = %error, "System reported an error");
        }
        self.outcomes.clear();
        let mut outcomes = self.world.resource_mut::<Events<InteractionOutcome>>();
        self.outcomes.extend(outcomes.iter_current_update_events().cloned());
        outcomes.update();
        self.world.resource_mut::<Events<GameEvent>>().update();

        let clock = self.world.resource::<SimulationClock>();
        trace!(tick = clock.ticks, seconds = format!("{:.3}", clock.seconds), "Tick complete");

        self.world.resource::<GlobalState>().exit
    }

    /// Outcomes emitted during the last tick, in order.
    pub fn outcomes(&self) -> &[InteractionOutcome] {
        &self.outcomes
    }

    pub fn interaction(&self) -> &InteractionState {
        self.world.resource::<InteractionState>()
    }

    pub fn inventory(&self) -> &Inventory {
        self.world.resource::<Inventory>()
    }

    pub fn map(&self) -> &Map {
        self.world.resource::<Map>()
    }

    /// The player's anchor position and the cell they are targeting.
    pub fn player(&mut self) -> Option<(Vec2, GridCell)> {
        let mut query = self
            .world
            .query_filtered::<(&Position, &TargetCell), bevy_ecs::query::With<PlayerControlled>>();
        query
            .single(&self.world)
            .ok()
            .map(|(position, target)| (position.0, target.0))
    }
}
