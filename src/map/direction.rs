use glam::IVec2;
use strum_macros::AsRefStr;

/// The four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[repr(usize)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// The four cardinal directions.
    /// This is just a convenience constant for iterating over the directions.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the direction as a unit IVec2, with +Y pointing down the map.
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

/// Which way the character sprite is facing.
///
/// The sprite sheet only has left and right variants, so vertical movement keeps the last facing.
#[derive(bevy_ecs::component::Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl From<Facing> for Direction {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::Left => Direction::Left,
            Facing::Right => Direction::Right,
        }
    }
}
