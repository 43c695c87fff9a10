use std::collections::{HashMap, HashSet};

use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::{Res, ResMut},
};
use bitflags::bitflags;
use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::EnumIter;
use tracing::trace;

use crate::config::SceneConfig;
use crate::events::{GameCommand, GameEvent};

/// Keyboard keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Shift,
    Space,
    Tab,
    Escape,
    F1,
}

bitflags! {
    /// Logical actions, independent of the device that produced them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Actions: u16 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const RUN = 1 << 4;
        const INTERACT = 1 << 5;
        const MENU = 1 << 6;
        const EXIT = 1 << 7;
        const DEBUG = 1 << 8;
    }
}

bitflags! {
    /// Gamepad buttons. Bit `n` is standard-mapping button index `n`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct GamepadButtons: u16 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const L1 = 1 << 4;
        const R1 = 1 << 5;
        const L2 = 1 << 6;
        const R2 = 1 << 7;
        const SHARE = 1 << 8;
        const MENU = 1 << 9;
        const L3 = 1 << 10;
        const R3 = 1 << 11;
        const DPAD_UP = 1 << 12;
        const DPAD_DOWN = 1 << 13;
        const DPAD_LEFT = 1 << 14;
        const DPAD_RIGHT = 1 << 15;
    }
}

impl GamepadButtons {
    /// The button at a standard-mapping index, if there is one.
    pub fn from_index(index: u32) -> Option<Self> {
        1u16.checked_shl(index).and_then(Self::from_bits)
    }
}

/// Keys held down during the current frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            held: keys.iter().copied().collect(),
        }
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn held(&self) -> impl Iterator<Item = Key> + '_ {
        self.held.iter().copied()
    }
}

/// Snapshot of one gamepad.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadState {
    /// Left stick deflection, each axis in [-1, 1], +Y down.
    pub left_stick: Vec2,
    /// Right trigger pressure in [0, 1].
    pub right_trigger: f32,
    pub buttons: GamepadButtons,
}

/// Raw device state for one tick, written by the host before the schedule runs.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputFrame {
    pub keyboard: KeyboardState,
    /// Gamepad slots; empty slots are `None`.
    pub gamepads: SmallVec<[Option<GamepadState>; 4]>,
}

impl InputFrame {
    pub fn from_keys(keys: &[Key]) -> Self {
        Self {
            keyboard: KeyboardState::with_keys(keys),
            gamepads: SmallVec::new(),
        }
    }

    pub fn from_gamepad(pad: GamepadState) -> Self {
        Self {
            keyboard: KeyboardState::default(),
            gamepads: smallvec::smallvec![Some(pad)],
        }
    }

    /// The first connected gamepad, which is the only one the game reads.
    pub fn first_gamepad(&self) -> Option<&GamepadState> {
        self.gamepads.iter().flatten().next()
    }
}

#[derive(Debug, Clone, Resource)]
pub struct Bindings {
    key_bindings: HashMap<Key, Actions>,
    button_bindings: Vec<(GamepadButtons, Actions)>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut key_bindings = HashMap::new();

        // Player movement
        key_bindings.insert(Key::W, Actions::UP);
        key_bindings.insert(Key::Up, Actions::UP);
        key_bindings.insert(Key::S, Actions::DOWN);
        key_bindings.insert(Key::Down, Actions::DOWN);
        key_bindings.insert(Key::A, Actions::LEFT);
        key_bindings.insert(Key::Left, Actions::LEFT);
        key_bindings.insert(Key::D, Actions::RIGHT);
        key_bindings.insert(Key::Right, Actions::RIGHT);
        key_bindings.insert(Key::Shift, Actions::RUN);

        // Game actions
        key_bindings.insert(Key::Space, Actions::INTERACT);
        key_bindings.insert(Key::Tab, Actions::MENU);
        key_bindings.insert(Key::Escape, Actions::EXIT);
        key_bindings.insert(Key::F1, Actions::DEBUG);

        let button_bindings = vec![
            (GamepadButtons::A, Actions::INTERACT),
            (GamepadButtons::Y, Actions::MENU),
            (GamepadButtons::DPAD_UP, Actions::UP),
            (GamepadButtons::DPAD_DOWN, Actions::DOWN),
            (GamepadButtons::DPAD_LEFT, Actions::LEFT),
            (GamepadButtons::DPAD_RIGHT, Actions::RIGHT),
        ];

        Self {
            key_bindings,
            button_bindings,
        }
    }
}

impl Bindings {
    pub fn keyboard_actions(&self, keyboard: &KeyboardState) -> Actions {
        keyboard
            .held()
            .filter_map(|key| self.key_bindings.get(&key).copied())
            .fold(Actions::empty(), |acc, action| acc | action)
    }

    /// Stick deflection past `dead_zone` counts as a held direction; any trigger pressure runs.
    pub fn gamepad_actions(&self, pad: &GamepadState, dead_zone: f32) -> Actions {
        let mut actions = Actions::empty();

        actions.set(Actions::LEFT, pad.left_stick.x < -dead_zone);
        actions.set(Actions::RIGHT, pad.left_stick.x > dead_zone);
        actions.set(Actions::UP, pad.left_stick.y < -dead_zone);
        actions.set(Actions::DOWN, pad.left_stick.y > dead_zone);
        actions.set(Actions::RUN, pad.right_trigger > 0.0);

        for (button, action) in &self.button_bindings {
            if pad.buttons.contains(*button) {
                actions |= *action;
            }
        }

        actions
    }

    /// Actions held this frame across the keyboard and the first gamepad.
    pub fn actions(&self, frame: &InputFrame, dead_zone: f32) -> Actions {
        let keyboard = self.keyboard_actions(&frame.keyboard);
        let gamepad = frame
            .first_gamepad()
            .map(|pad| self.gamepad_actions(pad, dead_zone))
            .unwrap_or_default();
        keyboard | gamepad
    }
}

/// Held actions for the current tick, plus those that went down this tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    held: Actions,
    pressed: Actions,
}

impl ActionState {
    pub fn advance(&mut self, held: Actions) {
        self.pressed = held & !self.held;
        self.held = held;
    }

    pub fn held(&self) -> Actions {
        self.held
    }

    pub fn pressed(&self) -> Actions {
        self.pressed
    }

    pub fn is_held(&self, action: Actions) -> bool {
        self.held.intersects(action)
    }

    pub fn just_pressed(&self, action: Actions) -> bool {
        self.pressed.intersects(action)
    }
}

/// Maps freshly pressed actions to the commands they trigger.
pub fn commands_for(pressed: Actions) -> SmallVec<[GameCommand; 6]> {
    const MAPPING: [(Actions, GameCommand); 6] = [
        (Actions::EXIT, GameCommand::Exit),
        (Actions::DEBUG, GameCommand::ToggleDebug),
        (Actions::MENU, GameCommand::Menu),
        (Actions::INTERACT, GameCommand::Interact),
        (Actions::UP, GameCommand::SelectUp),
        (Actions::DOWN, GameCommand::SelectDown),
    ];

    MAPPING
        .iter()
        .filter(|(action, _)| pressed.contains(*action))
        .map(|(_, command)| *command)
        .collect()
}

/// Samples one frame of input into `state` and returns the commands it produced.
pub fn process_input(
    bindings: &Bindings,
    frame: &InputFrame,
    dead_zone: f32,
    state: &mut ActionState,
) -> SmallVec<[GameCommand; 6]> {
    state.advance(bindings.actions(frame, dead_zone));
    commands_for(state.pressed())
}

pub fn input_system(
    bindings: Res<Bindings>,
    frame: Res<InputFrame>,
    config: Res<SceneConfig>,
    mut state: ResMut<ActionState>,
    mut writer: EventWriter<GameEvent>,
) {
    for command in process_input(&bindings, &frame, config.stick_dead_zone, &mut state) {
        trace!(?command, "Input command");
        writer.write(GameEvent::Command(command));
    }
}
