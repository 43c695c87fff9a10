use bevy_ecs::{system::RunSystemOnce, world::World};
use forager::events::GameCommand;
use forager::map::GridCell;
use forager::systems::{
    interaction_system, ForagableKind, Foragables, InteractionContext, InteractionOutcome, InteractionState, Inventory,
    Quest, QuestBoard, SimulationClock,
};
use speculoos::prelude::*;

mod common;

const SIGN: GridCell = GridCell::new(5, 2);

fn test_board() -> QuestBoard {
    QuestBoard::from_kinds(&common::kinds(&[0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3]))
}

/// Runs one command through the machine with the player targeting `target`.
fn apply(
    world: &mut World,
    state: InteractionState,
    command: GameCommand,
    target: GridCell,
    now: f64,
) -> (InteractionState, Vec<InteractionOutcome>) {
    let map = common::create_test_map();
    let board = test_board();
    let mut foragables = world.remove_resource::<Foragables>().unwrap();
    let mut inventory = world.remove_resource::<Inventory>().unwrap();

    let mut ctx = InteractionContext {
        target,
        map: &map,
        board: &board,
        foragables: &mut foragables,
        inventory: &mut inventory,
        now,
    };
    let (next, outcomes) = state.apply(command, &mut ctx);

    world.insert_resource(foragables);
    world.insert_resource(inventory);
    (next, outcomes.into_vec())
}

mod idle_tests {
    use super::*;

    #[test]
    fn interact_with_sign_opens_menu() {
        let mut world = common::create_test_world();
        let (state, outcomes) = apply(&mut world, InteractionState::Idle, GameCommand::Interact, SIGN, 0.0);

        assert_that(&state).is_equal_to(InteractionState::QuestMenuOpen { selected: 0 });
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::MenuOpened]);
    }

    #[test]
    fn interact_with_foragable_collects_it() {
        let mut world = common::create_test_world();
        let cell = GridCell::new(7, 3);
        let entity = common::spawn_test_foragable(&mut world, cell, 2);

        let (state, outcomes) = apply(&mut world, InteractionState::Idle, GameCommand::Interact, cell, 0.0);

        assert_that(&state).is_equal_to(InteractionState::Idle);
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::Collected {
            cell,
            entity,
            kind: ForagableKind(2),
        }]);
        assert_that(&world.resource::<Inventory>().len()).is_equal_to(1);
    }

    #[test]
    fn interact_with_nothing() {
        let mut world = common::create_test_world();
        let cell = GridCell::new(1, 1);
        let (state, outcomes) = apply(&mut world, InteractionState::Idle, GameCommand::Interact, cell, 0.0);

        assert_that(&state).is_equal_to(InteractionState::Idle);
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::NothingThere { cell }]);
    }

    #[test]
    fn selection_and_menu_are_ignored() {
        let mut world = common::create_test_world();
        for command in [GameCommand::SelectUp, GameCommand::SelectDown, GameCommand::Menu] {
            let (state, outcomes) = apply(&mut world, InteractionState::Idle, command, SIGN, 0.0);
            assert_that(&state).is_equal_to(InteractionState::Idle);
            assert_that(&outcomes).is_empty();
        }
    }
}

mod menu_tests {
    use super::*;

    #[test]
    fn selection_moves_and_clamps() {
        let mut world = common::create_test_world();
        let mut state = InteractionState::QuestMenuOpen { selected: 0 };

        let (next, outcomes) = apply(&mut world, state, GameCommand::SelectUp, SIGN, 0.0);
        assert_that(&next).is_equal_to(InteractionState::QuestMenuOpen { selected: 0 });
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::SelectionMoved { selected: 0 }]);
        state = next;

        for _ in 0..5 {
            state = apply(&mut world, state, GameCommand::SelectDown, SIGN, 0.0).0;
        }
        assert_that(&state).is_equal_to(InteractionState::QuestMenuOpen { selected: 3 });

        state = apply(&mut world, state, GameCommand::SelectUp, SIGN, 0.0).0;
        assert_that(&state).is_equal_to(InteractionState::QuestMenuOpen { selected: 2 });
    }

    #[test]
    fn accepting_starts_the_selected_quest() {
        let mut world = common::create_test_world();
        world.resource_mut::<Inventory>().push(ForagableKind(5)).unwrap();

        let (state, outcomes) = apply(
            &mut world,
            InteractionState::QuestMenuOpen { selected: 2 },
            GameCommand::Interact,
            SIGN,
            12.5,
        );

        assert_that(&state).is_equal_to(InteractionState::QuestActive {
            option: 2,
            quest: Quest::new(common::kinds(&[2, 2, 2, 2, 2])),
            started_at: 12.5,
        });
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::QuestStarted { option: 2 }]);
        assert_that(&world.resource::<Inventory>().is_empty()).is_true();
    }

    #[test]
    fn menu_button_closes() {
        let mut world = common::create_test_world();
        let (state, outcomes) = apply(
            &mut world,
            InteractionState::QuestMenuOpen { selected: 1 },
            GameCommand::Menu,
            SIGN,
            0.0,
        );

        assert_that(&state).is_equal_to(InteractionState::Idle);
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::MenuClosed]);
    }

    #[test]
    fn menu_blocks_movement() {
        assert_that(&InteractionState::QuestMenuOpen { selected: 0 }.blocks_movement()).is_true();
        assert_that(&InteractionState::Idle.blocks_movement()).is_false();
    }
}

mod quest_tests {
    use super::*;

    fn active(started_at: f64) -> InteractionState {
        InteractionState::QuestActive {
            option: 1,
            quest: Quest::new(common::kinds(&[1, 1, 1, 1, 1])),
            started_at,
        }
    }

    #[test]
    fn collecting_the_last_slot_completes_the_quest() {
        let mut world = common::create_test_world();
        let cells: Vec<GridCell> = (1..=5).map(|x| GridCell::new(x, 5)).collect();
        for cell in &cells {
            common::spawn_test_foragable(&mut world, *cell, 1);
        }

        let mut state = active(2.0);
        for cell in &cells[..4] {
            let (next, outcomes) = apply(&mut world, state, GameCommand::Interact, *cell, 5.0);
            assert_that(&outcomes).has_length(1);
            state = next;
        }
        assert_that(&matches!(state, InteractionState::QuestActive { .. })).is_true();

        let (state, outcomes) = apply(&mut world, state, GameCommand::Interact, cells[4], 12.0);
        let summary = match &state {
            InteractionState::QuestComplete { summary } => summary.clone(),
            other => panic!("expected a completed quest, got {:?}", other),
        };

        assert_that(&summary.matched).is_equal_to(5);
        assert_that(&summary.elapsed_seconds).is_equal_to(10.0);
        assert_that(&summary.score).is_equal_to(3750);
        assert_that(&outcomes).has_length(2);
        assert_that(&outcomes[1]).is_equal_to(InteractionOutcome::QuestCompleted { summary });
        assert_that(&state.blocks_movement()).is_true();
    }

    #[test]
    fn missing_collect_keeps_quest_running() {
        let mut world = common::create_test_world();
        let cell = GridCell::new(3, 3);
        let (state, outcomes) = apply(&mut world, active(0.0), GameCommand::Interact, cell, 1.0);

        assert_that(&state).is_equal_to(active(0.0));
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::NothingThere { cell }]);
    }

    #[test]
    fn menu_button_abandons() {
        let mut world = common::create_test_world();
        let (state, outcomes) = apply(&mut world, active(0.0), GameCommand::Menu, SIGN, 1.0);

        assert_that(&state).is_equal_to(InteractionState::Idle);
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::QuestAbandoned]);
    }

    #[test]
    fn dismissing_summary_clears_inventory() {
        let mut world = common::create_test_world();
        let cells: Vec<GridCell> = (1..=5).map(|x| GridCell::new(x, 1)).collect();
        let mut state = active(0.0);
        for cell in &cells {
            common::spawn_test_foragable(&mut world, *cell, 0);
            state = apply(&mut world, state, GameCommand::Interact, *cell, 1.0).0;
        }
        assert_that(&world.resource::<Inventory>().is_full()).is_true();

        let (state, outcomes) = apply(&mut world, state, GameCommand::Interact, SIGN, 2.0);
        assert_that(&state).is_equal_to(InteractionState::Idle);
        assert_that(&outcomes).is_equal_to(vec![InteractionOutcome::SummaryDismissed]);
        assert_that(&world.resource::<Inventory>().is_empty()).is_true();
    }
}

mod system_tests {
    use super::*;

    #[test]
    fn interaction_system_collects_and_despawns() {
        let mut world = common::create_test_world();
        let player = common::spawn_test_player(&mut world, GridCell::new(2, 2));
        let cell = GridCell::new(3, 2);
        let foragable = common::spawn_test_foragable(&mut world, cell, 3);
        common::set_target(&mut world, player, cell);
        common::send_command(&mut world, GameCommand::Interact);

        world
            .run_system_once(interaction_system)
            .expect("System should run successfully");

        assert_that(&world.get_entity(foragable).is_err()).is_true();
        assert_that(&world.resource::<Foragables>().contains(cell)).is_false();
        assert_that(&world.resource::<Inventory>().items().to_vec()).is_equal_to(vec![ForagableKind(3)]);
        assert_that(&common::outcomes(&world)).is_equal_to(vec![InteractionOutcome::Collected {
            cell,
            entity: foragable,
            kind: ForagableKind(3),
        }]);
    }

    #[test]
    fn interaction_system_runs_menu_flow() {
        let mut world = common::create_test_world();
        world.insert_resource(test_board());
        world.insert_resource(SimulationClock {
            seconds: 3.0,
            ticks: 180,
        });
        let player = common::spawn_test_player(&mut world, GridCell::new(4, 2));
        common::set_target(&mut world, player, SIGN);

        for command in [GameCommand::Interact, GameCommand::SelectDown, GameCommand::Interact] {
            common::send_command(&mut world, command);
        }
        world
            .run_system_once(interaction_system)
            .expect("System should run successfully");

        assert_that(world.resource::<InteractionState>()).is_equal_to(&InteractionState::QuestActive {
            option: 1,
            quest: Quest::new(common::kinds(&[1, 1, 1, 1, 1])),
            started_at: 3.0,
        });
        assert_that(&common::outcomes(&world)).is_equal_to(vec![
            InteractionOutcome::MenuOpened,
            InteractionOutcome::SelectionMoved { selected: 1 },
            InteractionOutcome::QuestStarted { option: 1 },
        ]);
    }

    #[test]
    fn interaction_system_ignores_global_commands() {
        let mut world = common::create_test_world();
        let player = common::spawn_test_player(&mut world, GridCell::new(4, 2));
        common::set_target(&mut world, player, SIGN);
        common::send_command(&mut world, GameCommand::Exit);
        common::send_command(&mut world, GameCommand::ToggleDebug);

        world
            .run_system_once(interaction_system)
            .expect("System should run successfully");

        assert_that(world.resource::<InteractionState>()).is_equal_to(&InteractionState::Idle);
        assert_that(&common::outcomes(&world)).is_empty();
    }
}
