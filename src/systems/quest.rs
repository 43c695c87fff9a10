//! Quest offers and completion scoring.

use bevy_ecs::resource::Resource;
use smallvec::SmallVec;

use crate::constants::quest::{PAR_SECONDS, QUEST_OPTIONS, QUEST_SIZE, SCORE_PER_ITEM};
use crate::systems::foragable::ForagableKind;

/// A set of foragable kinds to collect, kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Quest {
    items: SmallVec<[ForagableKind; QUEST_SIZE]>,
}

impl Quest {
    pub fn new(items: impl IntoIterator<Item = ForagableKind>) -> Self {
        let mut items: SmallVec<[ForagableKind; QUEST_SIZE]> = items.into_iter().collect();
        items.sort();
        Self { items }
    }

    pub fn items(&self) -> &[ForagableKind] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The quests offered by the quest menu.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct QuestBoard {
    options: [Quest; QUEST_OPTIONS],
}

impl QuestBoard {
    /// Splits the spawned kinds into consecutive quests of `QUEST_SIZE`.
    ///
    /// Options past the end of `kinds` are short or empty.
    pub fn from_kinds(kinds: &[ForagableKind]) -> Self {
        let mut chunks = kinds.chunks(QUEST_SIZE);
        let options = std::array::from_fn(|_| Quest::new(chunks.next().unwrap_or_default().iter().copied()));
        Self { options }
    }

    pub fn option(&self, index: usize) -> Option<&Quest> {
        self.options.get(index)
    }

    pub fn options(&self) -> &[Quest] {
        &self.options
    }

    /// Index of the last option; the selection cursor never goes past it.
    pub const fn last_index(&self) -> usize {
        QUEST_OPTIONS - 1
    }
}

/// Moves the selection cursor up one option, stopping at the first.
pub fn select_up(selected: usize) -> usize {
    selected.saturating_sub(1)
}

/// Moves the selection cursor down one option, stopping at `last`.
pub fn select_down(selected: usize, last: usize) -> usize {
    (selected + 1).min(last)
}

/// Outcome of a finished quest.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestSummary {
    pub quest: Quest,
    /// Collected kinds, sorted.
    pub collected: SmallVec<[ForagableKind; 8]>,
    pub elapsed_seconds: f32,
    /// How many collected items satisfied a quest entry.
    pub matched: usize,
    pub score: u32,
}

impl QuestSummary {
    /// Scores a finished quest.
    ///
    /// Each collected item may satisfy at most one remaining quest entry. Every match is worth
    /// `SCORE_PER_ITEM`, scaled down linearly to zero at `PAR_SECONDS`.
    pub fn new(quest: &Quest, collected: &[ForagableKind], elapsed_seconds: f32) -> Self {
        let mut remaining: SmallVec<[ForagableKind; QUEST_SIZE]> = quest.items.clone();
        let mut matched = 0;
        for kind in collected {
            if let Some(index) = remaining.iter().position(|wanted| wanted == kind) {
                remaining.swap_remove(index);
                matched += 1;
            }
        }

        let raw = (matched as u32 * SCORE_PER_ITEM) as f32;
        let score = (raw * ((PAR_SECONDS - elapsed_seconds) / PAR_SECONDS)).max(0.0).round() as u32;

        let mut collected: SmallVec<[ForagableKind; 8]> = collected.iter().copied().collect();
        collected.sort();

        Self {
            quest: quest.clone(),
            collected,
            elapsed_seconds,
            matched,
            score,
        }
    }
}
