//! The action-button state machine: signs open the quest menu, the menu starts quests,
//! and foragables under the target cell are collected.

use bevy_ecs::{
    entity::Entity,
    event::{Event, EventReader, EventWriter},
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use smallvec::{smallvec, SmallVec};
use tracing::{debug, info};

use crate::{
    error::GameError,
    events::{GameCommand, GameEvent},
    map::{GridCell, Map},
    systems::{
        components::{PlayerControlled, SimulationClock, TargetCell},
        foragable::{ForagableKind, Foragables},
        inventory::{collect, CollectOutcome, Inventory},
        quest::{select_down, select_up, Quest, QuestBoard, QuestSummary},
    },
};

#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Free roaming. Items can still be picked up.
    #[default]
    Idle,
    /// The quest menu is shown with the cursor on option `selected`.
    QuestMenuOpen { selected: usize },
    /// A quest is running; it completes when the inventory fills up.
    QuestActive {
        option: usize,
        quest: Quest,
        /// Simulation time the quest was accepted at, in seconds.
        started_at: f64,
    },
    /// The quest summary is shown until dismissed.
    QuestComplete { summary: QuestSummary },
}

/// Observable result of handling one command.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    MenuOpened,
    MenuClosed,
    SelectionMoved { selected: usize },
    QuestStarted { option: usize },
    Collected {
        cell: GridCell,
        entity: Entity,
        kind: ForagableKind,
    },
    NothingThere { cell: GridCell },
    InventoryFull,
    QuestCompleted { summary: QuestSummary },
    QuestAbandoned,
    SummaryDismissed,
}

/// Everything a transition may read or mutate besides the state itself.
pub struct InteractionContext<'a> {
    pub target: GridCell,
    pub map: &'a Map,
    pub board: &'a QuestBoard,
    pub foragables: &'a mut Foragables,
    pub inventory: &'a mut Inventory,
    /// Current simulation time, in seconds.
    pub now: f64,
}

type Outcomes = SmallVec<[InteractionOutcome; 2]>;

impl InteractionState {
    /// Whether a menu or summary is covering the scene.
    pub fn blocks_movement(&self) -> bool {
        matches!(
            self,
            InteractionState::QuestMenuOpen { .. } | InteractionState::QuestComplete { .. }
        )
    }

    /// Applies one command, returning the next state and what happened.
    ///
    /// Commands that mean nothing in the current state return the state unchanged with no outcomes.
    pub fn apply(self, command: GameCommand, ctx: &mut InteractionContext<'_>) -> (Self, Outcomes) {
        use InteractionState::*;

        match (self, command) {
            (Idle, GameCommand::Interact) if ctx.map.is_sign(ctx.target) => {
                (QuestMenuOpen { selected: 0 }, smallvec![InteractionOutcome::MenuOpened])
            }
            (Idle, GameCommand::Interact) => (Idle, smallvec![Self::collect_target(ctx)]),

            (QuestMenuOpen { selected }, GameCommand::SelectUp) => {
                let selected = select_up(selected);
                (
                    QuestMenuOpen { selected },
                    smallvec![InteractionOutcome::SelectionMoved { selected }],
                )
            }
            (QuestMenuOpen { selected }, GameCommand::SelectDown) => {
                let selected = select_down(selected, ctx.board.last_index());
                (
                    QuestMenuOpen { selected },
                    smallvec![InteractionOutcome::SelectionMoved { selected }],
                )
            }
            (QuestMenuOpen { selected }, GameCommand::Interact) => {
                let quest = ctx.board.option(selected).cloned().unwrap_or_default();
                ctx.inventory.clear();
                (
                    QuestActive {
                        option: selected,
                        quest,
                        started_at: ctx.now,
                    },
                    smallvec![InteractionOutcome::QuestStarted { option: selected }],
                )
            }
            (QuestMenuOpen { .. }, GameCommand::Menu) => (Idle, smallvec![InteractionOutcome::MenuClosed]),

            (
                QuestActive {
                    option,
                    quest,
                    started_at,
                },
                GameCommand::Interact,
            ) => {
                let collected = Self::collect_target(ctx);
                if ctx.inventory.is_full() {
                    let elapsed = (ctx.now - started_at) as f32;
                    let summary = QuestSummary::new(&quest, ctx.inventory.items(), elapsed);
                    (
                        QuestComplete {
                            summary: summary.clone(),
                        },
                        smallvec![collected, InteractionOutcome::QuestCompleted { summary }],
                    )
                } else {
                    (
                        QuestActive {
                            option,
                            quest,
                            started_at,
                        },
                        smallvec![collected],
                    )
                }
            }
            (QuestActive { .. }, GameCommand::Menu) => (Idle, smallvec![InteractionOutcome::QuestAbandoned]),

            (QuestComplete { .. }, GameCommand::Interact | GameCommand::Menu) => {
                ctx.inventory.clear();
                (Idle, smallvec![InteractionOutcome::SummaryDismissed])
            }

            (state, _) => (state, SmallVec::new()),
        }
    }

    fn collect_target(ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        match collect(ctx.target, ctx.foragables, ctx.inventory) {
            CollectOutcome::Collected { entity, kind } => InteractionOutcome::Collected {
                cell: ctx.target,
                entity,
                kind,
            },
            CollectOutcome::NothingThere => InteractionOutcome::NothingThere { cell: ctx.target },
            CollectOutcome::InventoryFull => InteractionOutcome::InventoryFull,
        }
    }
}

/// Routes action, menu and selection commands through the [`InteractionState`] machine.
#[allow(clippy::too_many_arguments)]
pub fn interaction_system(
    mut commands: Commands,
    mut events: EventReader<GameEvent>,
    mut outcomes: EventWriter<InteractionOutcome>,
    mut errors: EventWriter<GameError>,
    mut state: ResMut<InteractionState>,
    map: Res<Map>,
    board: Res<QuestBoard>,
    mut foragables: ResMut<Foragables>,
    mut inventory: ResMut<Inventory>,
    clock: Res<SimulationClock>,
    players: Query<&TargetCell, With<PlayerControlled>>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = *event;
        if !matches!(
            command,
            GameCommand::Interact | GameCommand::Menu | GameCommand::SelectUp | GameCommand::SelectDown
        ) {
            continue;
        }

        let target = match players.single() {
            Ok(target) => target.0,
            Err(e) => {
                errors.write(GameError::InvalidState(format!(
                    "No/multiple entities queried for interaction system: {}",
                    e
                )));
                return;
            }
        };

        let mut ctx = InteractionContext {
            target,
            map: &map,
            board: &board,
            foragables: &mut foragables,
            inventory: &mut inventory,
            now: clock.seconds,
        };
        let (next, results) = std::mem::take(&mut *state).apply(command, &mut ctx);
        *state = next;

        for outcome in results {
            match &outcome {
                InteractionOutcome::Collected { cell, entity, kind } => {
                    commands.entity(*entity).despawn();
                    debug!(%cell, kind = kind.0, held = inventory.len(), "Foragable collected");
                }
                InteractionOutcome::QuestStarted { option } => info!(option, "Quest started"),
                InteractionOutcome::QuestCompleted { summary } => info!(
                    score = summary.score,
                    matched = summary.matched,
                    elapsed = format!("{:.1}s", summary.elapsed_seconds),
                    "Quest complete"
                ),
                other => debug!(outcome = ?other, "Interaction"),
            }
            outcomes.write(outcome);
        }
    }
}
