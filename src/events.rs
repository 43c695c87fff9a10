use bevy_ecs::prelude::*;

/// Logical commands produced by the input layer, one per button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    ToggleDebug,
    /// The action button: talk to signs, confirm menu choices, pick things up.
    Interact,
    /// The menu button: closes the quest menu or abandons the running quest.
    Menu,
    SelectUp,
    SelectDown,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}
