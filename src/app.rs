//! Headless driver: runs the scene on a fixed tick with scripted keyboard input.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use glam::Vec2;
use pathfinding::prelude::bfs;
use tracing::{debug, info, warn};

use crate::constants::LOOP_TIME;
use crate::game::Game;
use crate::map::{Direction, GridCell, Map};
use crate::systems::{
    world_to_cell, Foragables, InputFrame, InteractionOutcome, InteractionState, Key, QuestSummary, SimulationClock,
};

/// Ticks without the player changing cell before the autopilot gives up on a foragable.
const STUCK_TICKS: u32 = 45;
/// Hard limit on the length of a scripted run (two minutes of simulated time).
const MAX_TICKS: u64 = 60 * 120;
/// Longest frame fed to the simulation in realtime mode; slower frames are slowed down, not skipped.
const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    WalkToSign,
    OpenMenu,
    ChooseQuest,
    AcceptQuest,
    Forage,
    Dismiss,
    Quit,
}

/// Plays the scene like a player would: accept the second quest at the sign, then gather
/// the nearest reachable foragables until the quest completes.
pub struct Autopilot {
    phase: Phase,
    /// A key pressed for exactly one tick, released on the next.
    tapped: bool,
    last_cell: Option<GridCell>,
    stuck_for: u32,
    abandoned: HashSet<GridCell>,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            phase: Phase::WalkToSign,
            tapped: false,
            last_cell: None,
            stuck_for: 0,
            abandoned: HashSet::new(),
        }
    }
}

impl Autopilot {
    /// Produces the input for the next tick from the scene's current state.
    pub fn next_frame(&mut self, game: &mut Game) -> InputFrame {
        if self.tapped {
            self.tapped = false;
            return InputFrame::default();
        }

        let Some((position, target)) = game.player() else {
            return InputFrame::from_keys(&[Key::Escape]);
        };

        match self.phase {
            Phase::WalkToSign => {
                if game.map().is_sign(target) {
                    self.advance(Phase::OpenMenu);
                    return InputFrame::default();
                }
                let map = game.map();
                let foragables = game.world.resource::<Foragables>();
                match route(map, foragables, world_to_cell(position), |cell| map.is_sign(cell)) {
                    Some((key, _)) => InputFrame::from_keys(&[key]),
                    None => {
                        warn!("No sign within reach");
                        self.tap(Phase::Quit, Key::Escape)
                    }
                }
            }
            Phase::OpenMenu => self.tap(Phase::ChooseQuest, Key::Space),
            Phase::ChooseQuest => self.tap(Phase::AcceptQuest, Key::Down),
            Phase::AcceptQuest => self.tap(Phase::Forage, Key::Space),
            Phase::Forage => self.forage(game, position, target),
            Phase::Dismiss => self.tap(Phase::Quit, Key::Space),
            Phase::Quit => self.tap(Phase::Quit, Key::Escape),
        }
    }

    fn forage(&mut self, game: &mut Game, position: Vec2, target: GridCell) -> InputFrame {
        if matches!(game.interaction(), InteractionState::QuestComplete { .. }) {
            self.advance(Phase::Dismiss);
            return InputFrame::default();
        }

        let foragables = game.world.resource::<Foragables>();
        if foragables.contains(target) {
            return self.tap(Phase::Forage, Key::Space);
        }

        let cell = world_to_cell(position);
        if self.last_cell == Some(cell) {
            self.stuck_for += 1;
        } else {
            self.last_cell = Some(cell);
            self.stuck_for = 0;
        }

        let wanted = |candidate: GridCell| foragables.contains(candidate) && !self.abandoned.contains(&candidate);
        let Some((key, goal)) = route(game.map(), foragables, cell, wanted) else {
            warn!("No reachable foragables left");
            return self.tap(Phase::Quit, Key::Escape);
        };

        if self.stuck_for > STUCK_TICKS {
            debug!(%goal, "Autopilot stuck, skipping foragable");
            self.abandoned.insert(goal);
            self.stuck_for = 0;
            return InputFrame::default();
        }

        InputFrame::from_keys(&[key])
    }

    fn tap(&mut self, next: Phase, key: Key) -> InputFrame {
        self.tapped = true;
        self.advance(next);
        InputFrame::from_keys(&[key])
    }

    fn advance(&mut self, next: Phase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "Autopilot phase");
            self.phase = next;
        }
    }
}

/// The key that moves the player one cell along the shortest walk to a cell beside a goal,
/// or turns them toward the goal once they stand beside it, along with that goal.
///
/// Walking avoids solid tiles and foragables. Returns `None` when no goal can be reached.
fn route(
    map: &Map,
    foragables: &Foragables,
    from: GridCell,
    is_goal: impl Fn(GridCell) -> bool,
) -> Option<(Key, GridCell)> {
    let goal_beside = |cell: GridCell| {
        Direction::DIRECTIONS
            .into_iter()
            .find(|direction| is_goal(cell.step(*direction)))
    };

    let path = bfs(
        &from,
        |&cell| {
            Direction::DIRECTIONS
                .into_iter()
                .map(|direction| cell.step(direction))
                .filter(|next| !map.is_blocked(*next) && !foragables.contains(*next))
                .collect::<Vec<_>>()
        },
        |&cell| goal_beside(cell).is_some(),
    )?;

    let last = *path.last()?;
    let goal = last.step(goal_beside(last)?);
    let direction = match path.get(1) {
        Some(next) => Direction::DIRECTIONS.into_iter().find(|direction| from.step(*direction) == *next)?,
        None => goal_beside(from)?,
    };
    Some((key_for(direction), goal))
}

fn key_for(direction: Direction) -> Key {
    match direction {
        Direction::Up => Key::Up,
        Direction::Down => Key::Down,
        Direction::Left => Key::Left,
        Direction::Right => Key::Right,
    }
}

/// Seconds of simulation a realtime frame advances, capped at `MAX_FRAME_TIME`.
pub fn frame_seconds(elapsed: Duration) -> f32 {
    elapsed.min(MAX_FRAME_TIME).as_secs_f32()
}

pub struct App {
    pub game: Game,
    autopilot: Autopilot,
    realtime: bool,
    last_tick: Instant,
    summary: Option<QuestSummary>,
}

impl App {
    /// Wraps a scene. With `realtime`, ticks are paced to `LOOP_TIME`; otherwise they run back to back.
    pub fn new(game: Game, realtime: bool) -> Self {
        Self {
            game,
            autopilot: Autopilot::default(),
            realtime,
            last_tick: Instant::now(),
            summary: None,
        }
    }

    /// Executes a single tick.
    ///
    /// # Returns
    ///
    /// `true` if the game should continue running, `false` if the game requested exit.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();
        let dt = if self.realtime {
            frame_seconds(self.last_tick.elapsed())
        } else {
            LOOP_TIME.as_secs_f32()
        };
        self.last_tick = start;

        let input = self.autopilot.next_frame(&mut self.game);
        let exit = self.game.tick(dt, input);
        for outcome in self.game.outcomes() {
            if let InteractionOutcome::QuestCompleted { summary } = outcome {
                self.summary = Some(summary.clone());
            }
        }
        if exit {
            return false;
        }

        let ticks = self.game.world.resource::<SimulationClock>().ticks;
        if ticks >= MAX_TICKS {
            warn!(ticks, "Tick limit reached, stopping");
            return false;
        }

        if self.realtime {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                spin_sleep::sleep(time);
            }
        }

        true
    }

    /// Logs where the run ended up.
    pub fn report(&self) {
        let remaining = self.game.world.resource::<Foragables>().len();
        match &self.summary {
            Some(summary) => info!(
                score = summary.score,
                matched = summary.matched,
                wanted = summary.quest.len(),
                elapsed = format!("{:.2}s", summary.elapsed_seconds),
                remaining,
                "Run finished"
            ),
            None => warn!(remaining, "Run finished without completing a quest"),
        }
    }

    pub fn summary(&self) -> Option<&QuestSummary> {
        self.summary.as_ref()
    }
}
