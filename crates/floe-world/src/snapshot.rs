//! Read-only per-step status published to external observers.

use floe_core::{Location, SpeciesId, Weather};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An owned copy of the field contents at the end of a step: the species in
/// each cell, plus per-species counts. Observers cannot reach the live
/// field through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    depth: i32,
    width: i32,
    /// Row-major cell contents.
    cells: Vec<Option<SpeciesId>>,
    counts: BTreeMap<SpeciesId, usize>,
}

impl FieldSnapshot {
    pub fn new(depth: i32, width: i32, cells: Vec<Option<SpeciesId>>) -> Self {
        let mut counts: BTreeMap<SpeciesId, usize> = BTreeMap::new();
        for species in cells.iter().flatten() {
            *counts.entry(species.clone()).or_insert(0) += 1;
        }
        Self {
            depth,
            width,
            cells,
            counts,
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn occupant_at(&self, location: Location) -> Option<&SpeciesId> {
        if location.row < 0
            || location.row >= self.depth
            || location.col < 0
            || location.col >= self.width
        {
            return None;
        }
        let index = (location.row * self.width + location.col) as usize;
        self.cells[index].as_ref()
    }

    pub fn species_count(&self, species: &SpeciesId) -> usize {
        self.counts.get(species).copied().unwrap_or(0)
    }

    /// Per-species population counts, ordered by species id.
    pub fn counts(&self) -> &BTreeMap<SpeciesId, usize> {
        &self.counts
    }

    /// Number of distinct species currently alive.
    pub fn species_present(&self) -> usize {
        self.counts.len()
    }

    pub fn total_population(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Everything published at the end of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStatus {
    pub step: u64,
    pub snapshot: FieldSnapshot,
    pub weather: Weather,
    pub is_day: bool,
    pub temperature: i32,
}

/// Receiver for per-step status. Implementations render, aggregate, or
/// discard; the engine never depends on what they do.
pub trait StatusSink {
    fn publish(&mut self, status: &StepStatus);
}

/// Sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn publish(&mut self, _status: &StepStatus) {}
}
