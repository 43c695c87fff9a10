//! Layered character animation. Every sprite part plays the same animation in lockstep.

use std::fmt;

use bevy_ecs::{
    component::Component,
    system::{Query, Res},
};
use glam::Vec2;
use smallvec::SmallVec;
use strum_macros::AsRefStr;
use tracing::trace;

use crate::constants::animation::{CHARACTER_PARTS, CYCLE_FRAMES, RUN_FRAME_RATE, WALK_FRAME_RATE};
use crate::map::Facing;
use crate::systems::components::{DeltaTime, MovementModifiers, Velocity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Gait {
    #[default]
    Stand,
    Walk,
    Run,
}

impl Gait {
    /// Frames per second, or zero for the single-frame standing pose.
    pub const fn frame_rate(self) -> u8 {
        match self {
            Gait::Stand => 0,
            Gait::Walk => WALK_FRAME_RATE,
            Gait::Run => RUN_FRAME_RATE,
        }
    }
}

/// Identifies one of the six character animations, e.g. `run-left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AnimationKey {
    pub gait: Gait,
    pub facing: Facing,
}

impl AnimationKey {
    pub const fn new(gait: Gait, facing: Facing) -> Self {
        Self { gait, facing }
    }
}

impl fmt::Display for AnimationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.gait.as_ref(), self.facing.as_ref())
    }
}

/// Name of a frame in the character atlas. Frames are numbered from 1, and every gait
/// draws from the walk cycle.
pub fn frame_name(part: &str, facing: Facing, frame: u8) -> String {
    format!("{}-walk-{}-{}", part, facing.as_ref(), frame)
}

/// A single layered sprite of the character.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub visual: &'static str,
    pub animation: AnimationKey,
}

impl Part {
    /// The atlas frame this part currently shows.
    pub fn frame_name(&self, frame: u8) -> String {
        frame_name(self.visual, self.animation.facing, frame)
    }
}

/// The player's sprite stack, plus the shared playback position of its animation.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Character {
    parts: SmallVec<[Part; 5]>,
    animation: AnimationKey,
    elapsed: f32,
}

impl Character {
    pub fn new(visuals: &[&'static str]) -> Self {
        let animation = AnimationKey::default();
        Self {
            parts: visuals.iter().map(|&visual| Part { visual, animation }).collect(),
            animation,
            elapsed: 0.0,
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn animation(&self) -> AnimationKey {
        self.animation
    }

    /// Switches every part to the animation matching the movement state.
    ///
    /// Returns `true` if the animation changed; playback restarts from the first frame.
    pub fn animate(&mut self, facing: Facing, moving: bool, running: bool) -> bool {
        let gait = match (moving, running) {
            (false, _) => Gait::Stand,
            (true, false) => Gait::Walk,
            (true, true) => Gait::Run,
        };
        let next = AnimationKey::new(gait, facing);
        if next == self.animation {
            return false;
        }

        self.animation = next;
        self.elapsed = 0.0;
        for part in self.parts.iter_mut() {
            part.animation = next;
        }
        true
    }

    /// Advances playback by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.animation.gait != Gait::Stand {
            self.elapsed += dt;
        }
    }

    /// Current frame number in `1..=CYCLE_FRAMES`. Cycles repeat indefinitely.
    pub fn frame(&self) -> u8 {
        let rate = self.animation.gait.frame_rate() as f32;
        let index = (self.elapsed * rate).floor() as u64 % CYCLE_FRAMES as u64;
        index as u8 + 1
    }

    /// The frame each part should display this tick, back to front.
    pub fn frame_names(&self) -> impl Iterator<Item = String> + '_ {
        let frame = self.frame();
        self.parts.iter().map(move |part| part.frame_name(frame))
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new(&CHARACTER_PARTS)
    }
}

pub fn character_animation_system(
    delta_time: Res<DeltaTime>,
    mut query: Query<(&Velocity, &Facing, &MovementModifiers, &mut Character)>,
) {
    for (velocity, facing, modifiers, mut character) in query.iter_mut() {
        let moving = velocity.0 != Vec2::ZERO;
        if character.animate(*facing, moving, modifiers.running) {
            trace!(animation = %character.animation(), "Animation changed");
        }
        character.tick(delta_time.seconds);
    }
}
