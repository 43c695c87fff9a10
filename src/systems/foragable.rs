//! Foragable placement and lookup.

use std::collections::HashMap;

use bevy_ecs::{component::Component, entity::Entity, resource::Resource, world::World};
use glam::UVec2;
use rand::{seq::IndexedRandom, Rng};
use tracing::{debug, info};

use crate::config::SceneConfig;
use crate::constants::forage::KIND_COUNT;
use crate::error::{GameResult, PlacementError};
use crate::map::{GridCell, Map};
use crate::systems::components::{Cell, ForagableBundle, Position};

/// Which sprite of the foragable sheet an item uses, in `0..KIND_COUNT`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForagableKind(pub u8);

impl ForagableKind {
    /// Draws a kind uniformly from the palette.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(0..KIND_COUNT))
    }
}

/// Parameters for scattering foragables over a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    /// Grid size in cells; candidates are drawn from `[0, size)`.
    pub size: UVec2,
    /// The player's starting cell.
    pub start: GridCell,
    /// Minimum Manhattan distance from `start`.
    pub min_distance: u32,
    pub count: usize,
}

/// Every cell a foragable could be placed on: in bounds, not forbidden, and far enough from the start.
pub fn eligible_cells(request: &PlacementRequest, forbidden: impl Fn(GridCell) -> bool) -> Vec<GridCell> {
    (0..request.size.y as i32)
        .flat_map(|y| (0..request.size.x as i32).map(move |x| GridCell::new(x, y)))
        .filter(|cell| !forbidden(*cell))
        .filter(|cell| cell.manhattan_distance(request.start) >= request.min_distance)
        .collect()
}

/// Picks `count` distinct eligible cells uniformly at random and assigns each a random kind.
///
/// # Errors
///
/// Returns `PlacementError::InsufficientSpace` when fewer than `count` cells are eligible.
pub fn place_foragables<R: Rng + ?Sized>(
    request: &PlacementRequest,
    forbidden: impl Fn(GridCell) -> bool,
    rng: &mut R,
) -> Result<HashMap<GridCell, ForagableKind>, PlacementError> {
    let candidates = eligible_cells(request, forbidden);
    if candidates.len() < request.count {
        return Err(PlacementError::InsufficientSpace {
            requested: request.count,
            available: candidates.len(),
        });
    }

    let cells: Vec<GridCell> = candidates.choose_multiple(rng, request.count).copied().collect();
    let placed = cells.into_iter().map(|cell| (cell, ForagableKind::random(rng))).collect();

    debug!(
        requested = request.count,
        eligible = candidates.len(),
        "Foragable cells chosen"
    );
    Ok(placed)
}

/// Live foragables by cell, for constant-time lookup of whatever sits under the target cell.
#[derive(Resource, Debug, Default)]
pub struct Foragables {
    by_cell: HashMap<GridCell, (Entity, ForagableKind)>,
}

impl Foragables {
    /// Records a foragable. Returns `false`, leaving the existing one in place, if the cell is taken.
    pub fn insert(&mut self, cell: GridCell, entity: Entity, kind: ForagableKind) -> bool {
        if self.by_cell.contains_key(&cell) {
            return false;
        }
        self.by_cell.insert(cell, (entity, kind));
        true
    }

    pub fn get(&self, cell: GridCell) -> Option<(Entity, ForagableKind)> {
        self.by_cell.get(&cell).copied()
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.by_cell.contains_key(&cell)
    }

    pub fn remove(&mut self, cell: GridCell) -> Option<(Entity, ForagableKind)> {
        self.by_cell.remove(&cell)
    }

    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCell, ForagableKind)> + '_ {
        self.by_cell.iter().map(|(cell, (_, kind))| (*cell, *kind))
    }

    /// Kinds of every live foragable, ordered by cell (row-major).
    pub fn kinds_in_cell_order(&self) -> Vec<ForagableKind> {
        let mut cells: Vec<(GridCell, ForagableKind)> = self.iter().collect();
        cells.sort_by_key(|(cell, _)| (cell.y, cell.x));
        cells.into_iter().map(|(_, kind)| kind).collect()
    }
}

/// Scatters the configured number of foragables over the map and registers them in [`Foragables`].
///
/// # Errors
///
/// Returns `GameError::Placement` if the map cannot fit the requested count.
pub fn spawn_foragables<R: Rng + ?Sized>(world: &mut World, rng: &mut R) -> GameResult<()> {
    let placed = {
        let map = world.resource::<Map>();
        let config = world.resource::<SceneConfig>();
        let request = PlacementRequest {
            size: map.size(),
            start: map.player_start(),
            min_distance: config.foragable_distance,
            count: config.foragable_count,
        };
        place_foragables(&request, |cell| map.is_blocked(cell), rng)?
    };

    let mut foragables = Foragables::default();
    for (cell, kind) in placed {
        let entity = world
            .spawn(ForagableBundle {
                kind,
                cell: Cell(cell),
                position: Position(cell.anchor()),
            })
            .id();
        foragables.insert(cell, entity, kind);
    }

    info!(count = foragables.len(), "Spawned foragables");
    world.insert_resource(foragables);
    Ok(())
}
