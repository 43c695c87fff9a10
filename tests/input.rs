use bevy_ecs::{event::Events, system::RunSystemOnce};
use forager::events::{GameCommand, GameEvent};
use forager::systems::input::{
    commands_for, input_system, process_input, ActionState, Actions, Bindings, GamepadButtons, GamepadState,
    InputFrame, Key, KeyboardState,
};
use glam::Vec2;
use speculoos::prelude::*;
use strum::IntoEnumIterator;

mod common;

const DEAD_ZONE: f32 = 0.3;

mod keyboard_tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_the_same_actions() {
        let bindings = Bindings::default();
        let pairs = [
            (Key::W, Key::Up, Actions::UP),
            (Key::A, Key::Left, Actions::LEFT),
            (Key::S, Key::Down, Actions::DOWN),
            (Key::D, Key::Right, Actions::RIGHT),
        ];

        for (letter, arrow, action) in pairs {
            assert_that(&bindings.keyboard_actions(&KeyboardState::with_keys(&[letter]))).is_equal_to(action);
            assert_that(&bindings.keyboard_actions(&KeyboardState::with_keys(&[arrow]))).is_equal_to(action);
        }
    }

    #[test]
    fn every_key_is_bound() {
        let bindings = Bindings::default();
        for key in Key::iter() {
            let actions = bindings.keyboard_actions(&KeyboardState::with_keys(&[key]));
            assert_that(&actions.is_empty()).is_false();
        }
    }

    #[test]
    fn held_keys_combine() {
        let bindings = Bindings::default();
        let actions = bindings.keyboard_actions(&KeyboardState::with_keys(&[Key::D, Key::W, Key::Shift]));
        assert_that(&actions).is_equal_to(Actions::RIGHT | Actions::UP | Actions::RUN);
    }

    #[test]
    fn press_and_release() {
        let mut keyboard = KeyboardState::default();
        keyboard.press(Key::Space);
        assert_that(&keyboard.is_down(Key::Space)).is_true();
        keyboard.release(Key::Space);
        assert_that(&keyboard.is_down(Key::Space)).is_false();
    }
}

mod gamepad_tests {
    use super::*;

    #[test]
    fn stick_inside_dead_zone_is_ignored() {
        let bindings = Bindings::default();
        let pad = GamepadState {
            left_stick: Vec2::new(0.29, -0.3),
            ..GamepadState::default()
        };
        assert_that(&bindings.gamepad_actions(&pad, DEAD_ZONE)).is_equal_to(Actions::empty());
    }

    #[test]
    fn stick_past_dead_zone_moves() {
        let bindings = Bindings::default();
        let pad = GamepadState {
            left_stick: Vec2::new(-0.8, 0.31),
            ..GamepadState::default()
        };
        assert_that(&bindings.gamepad_actions(&pad, DEAD_ZONE)).is_equal_to(Actions::LEFT | Actions::DOWN);
    }

    #[test]
    fn any_trigger_pressure_runs() {
        let bindings = Bindings::default();
        let pad = GamepadState {
            right_trigger: 0.05,
            ..GamepadState::default()
        };
        assert_that(&bindings.gamepad_actions(&pad, DEAD_ZONE)).is_equal_to(Actions::RUN);
    }

    #[test]
    fn buttons_map_to_actions() {
        let bindings = Bindings::default();
        let pad = GamepadState {
            buttons: GamepadButtons::A | GamepadButtons::Y | GamepadButtons::DPAD_UP,
            ..GamepadState::default()
        };
        assert_that(&bindings.gamepad_actions(&pad, DEAD_ZONE)).is_equal_to(Actions::INTERACT | Actions::MENU | Actions::UP);
    }

    #[test]
    fn button_indices_follow_standard_mapping() {
        assert_that(&GamepadButtons::from_index(0)).is_equal_to(Some(GamepadButtons::A));
        assert_that(&GamepadButtons::from_index(3)).is_equal_to(Some(GamepadButtons::Y));
        assert_that(&GamepadButtons::from_index(7)).is_equal_to(Some(GamepadButtons::R2));
        assert_that(&GamepadButtons::from_index(12)).is_equal_to(Some(GamepadButtons::DPAD_UP));
        assert_that(&GamepadButtons::from_index(15)).is_equal_to(Some(GamepadButtons::DPAD_RIGHT));
        assert_that(&GamepadButtons::from_index(16)).is_none();
    }

    #[test]
    fn only_first_connected_gamepad_is_read() {
        let bindings = Bindings::default();
        let mut frame = InputFrame::default();
        frame.gamepads.push(None);
        frame.gamepads.push(Some(GamepadState {
            buttons: GamepadButtons::A,
            ..GamepadState::default()
        }));
        frame.gamepads.push(Some(GamepadState {
            buttons: GamepadButtons::Y,
            ..GamepadState::default()
        }));

        assert_that(&bindings.actions(&frame, DEAD_ZONE)).is_equal_to(Actions::INTERACT);
    }
}

mod merge_tests {
    use super::*;

    #[test]
    fn keyboard_and_gamepad_are_merged() {
        let bindings = Bindings::default();
        let mut frame = InputFrame::from_keys(&[Key::A]);
        frame.gamepads.push(Some(GamepadState {
            left_stick: Vec2::new(0.0, -1.0),
            right_trigger: 1.0,
            ..GamepadState::default()
        }));

        assert_that(&bindings.actions(&frame, DEAD_ZONE)).is_equal_to(Actions::LEFT | Actions::UP | Actions::RUN);
    }

    #[test]
    fn held_button_presses_once() {
        let bindings = Bindings::default();
        let mut state = ActionState::default();
        let frame = InputFrame::from_keys(&[Key::Space]);

        let first = process_input(&bindings, &frame, DEAD_ZONE, &mut state);
        let second = process_input(&bindings, &frame, DEAD_ZONE, &mut state);

        assert_that(&first.to_vec()).is_equal_to(vec![GameCommand::Interact]);
        assert_that(&second.is_empty()).is_true();
        assert_that(&state.is_held(Actions::INTERACT)).is_true();
        assert_that(&state.just_pressed(Actions::INTERACT)).is_false();
    }

    #[test]
    fn release_and_press_again_fires_again() {
        let bindings = Bindings::default();
        let mut state = ActionState::default();

        process_input(&bindings, &InputFrame::from_keys(&[Key::Tab]), DEAD_ZONE, &mut state);
        process_input(&bindings, &InputFrame::default(), DEAD_ZONE, &mut state);
        let again = process_input(&bindings, &InputFrame::from_keys(&[Key::Tab]), DEAD_ZONE, &mut state);

        assert_that(&again.to_vec()).is_equal_to(vec![GameCommand::Menu]);
    }

    #[test]
    fn commands_for_orders_commands() {
        let commands = commands_for(Actions::DOWN | Actions::INTERACT | Actions::EXIT | Actions::RIGHT);
        assert_that(&commands.to_vec()).is_equal_to(vec![
            GameCommand::Exit,
            GameCommand::Interact,
            GameCommand::SelectDown,
        ]);
    }

    #[test]
    fn input_system_writes_commands() {
        let mut world = common::create_test_world();
        world.insert_resource(InputFrame::from_gamepad(GamepadState {
            buttons: GamepadButtons::DPAD_DOWN,
            ..GamepadState::default()
        }));

        world.run_system_once(input_system).expect("System should run successfully");

        let events = world.resource::<Events<GameEvent>>();
        let written: Vec<GameEvent> = events.iter_current_update_events().copied().collect();
        assert_that(&written).is_equal_to(vec![GameEvent::Command(GameCommand::SelectDown)]);
        assert_that(&world.resource::<ActionState>().held()).is_equal_to(Actions::DOWN);
    }
}
