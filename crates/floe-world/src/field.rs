//! Bounded occupancy grid for the world.

use floe_core::{Error, Location, OrganismId, Result};
use std::collections::HashMap;

/// A bounded 2D field holding at most one organism per cell.
///
/// The field only maps locations to organism ids; the engine owns the
/// organisms themselves. Callers are responsible for clearing a cell before
/// placing into it — `place` overwrites silently.
#[derive(Debug, Clone)]
pub struct Field {
    depth: i32,
    width: i32,
    occupants: HashMap<Location, OrganismId>,
}

impl Field {
    pub fn new(depth: i32, width: i32) -> Self {
        Self {
            depth,
            width,
            occupants: HashMap::new(),
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn contains(&self, location: Location) -> bool {
        location.row >= 0
            && location.row < self.depth
            && location.col >= 0
            && location.col < self.width
    }

    /// Record `id` as the occupant of `location`. Any previous occupant
    /// reference is overwritten.
    pub fn place(&mut self, id: OrganismId, location: Location) -> Result<()> {
        if !self.contains(location) {
            return Err(Error::OutOfBounds {
                row: location.row,
                col: location.col,
                depth: self.depth,
                width: self.width,
            });
        }
        self.occupants.insert(location, id);
        Ok(())
    }

    /// Remove and return the occupant of `location`, if any.
    pub fn clear(&mut self, location: Location) -> Option<OrganismId> {
        self.occupants.remove(&location)
    }

    pub fn occupant_at(&self, location: Location) -> Option<OrganismId> {
        self.occupants.get(&location).copied()
    }

    pub fn occupied_cells(&self) -> usize {
        self.occupants.len()
    }

    /// The up-to-8 in-bounds Moore neighbors of `location`, in a fixed
    /// row-major scan order. The order is stable across calls, so
    /// first-match feeding and front-first birth placement are reproducible.
    pub fn adjacent_locations(&self, location: Location) -> Vec<Location> {
        let mut adjacent = Vec::with_capacity(8);
        for drow in -1..=1 {
            for dcol in -1..=1 {
                if drow == 0 && dcol == 0 {
                    continue;
                }
                let neighbor = location.offset(drow, dcol);
                if self.contains(neighbor) {
                    adjacent.push(neighbor);
                }
            }
        }
        adjacent
    }

    /// The unoccupied subset of `adjacent_locations`, in the same order.
    /// Callers consume from the front when placing births.
    pub fn free_adjacent_locations(&self, location: Location) -> Vec<Location> {
        self.adjacent_locations(location)
            .into_iter()
            .filter(|loc| !self.occupants.contains_key(loc))
            .collect()
    }

    /// One free neighbor, or `None` when fully surrounded.
    pub fn any_free_adjacent_location(&self, location: Location) -> Option<Location> {
        self.adjacent_locations(location)
            .into_iter()
            .find(|loc| !self.occupants.contains_key(loc))
    }
}
