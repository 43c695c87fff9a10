use bevy_ecs::{entity::Entity, resource::Resource};
use smallvec::SmallVec;
use tracing::trace;

use crate::map::GridCell;
use crate::systems::foragable::{ForagableKind, Foragables};

/// Collected foragable kinds, in pickup order. Never holds more than its capacity.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    items: SmallVec<[ForagableKind; 8]>,
    capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: SmallVec::new(),
            capacity,
        }
    }

    /// Appends an item. When full, the item is handed back.
    pub fn push(&mut self, kind: ForagableKind) -> Result<(), ForagableKind> {
        if self.is_full() {
            return Err(kind);
        }
        self.items.push(kind);
        Ok(())
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

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Result of trying to pick up whatever sits on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// The foragable was removed from the lookup and added to the inventory.
    /// The caller is responsible for despawning `entity`.
    Collected { entity: Entity, kind: ForagableKind },
    NothingThere,
    /// A foragable is present but there is no room for it; it stays on the map.
    InventoryFull,
}

/// Moves the foragable on `cell`, if any, into the inventory.
pub fn collect(cell: GridCell, foragables: &mut Foragables, inventory: &mut Inventory) -> CollectOutcome {
    if !foragables.contains(cell) {
        return CollectOutcome::NothingThere;
    }
    if inventory.is_full() {
        trace!(%cell, capacity = inventory.capacity(), "Inventory full, foragable left in place");
        return CollectOutcome::InventoryFull;
    }

    match foragables.remove(cell) {
        Some((entity, kind)) => match inventory.push(kind) {
            Ok(()) => CollectOutcome::Collected { entity, kind },
            Err(kind) => {
                foragables.insert(cell, entity, kind);
                CollectOutcome::InventoryFull
            }
        },
        None => CollectOutcome::NothingThere,
    }
}
