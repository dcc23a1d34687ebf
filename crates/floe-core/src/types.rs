//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an organism instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cell coordinate on the field: (row, col), 0-indexed.
///
/// The field is bounded; there is no wrapping. Out-of-range locations are
/// rejected by the field, not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The location offset by (drow, dcol). May be out of bounds.
    pub fn offset(&self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Weather state, re-rolled on the environment cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Rain,
    Snow,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
        };
        f.pad(name)
    }
}

/// The environmental conditions an organism acts under, passed into each
/// action instead of read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    pub is_day: bool,
    pub weather: Weather,
}

impl Conditions {
    pub fn is_snowing(&self) -> bool {
        self.weather == Weather::Snow
    }

    pub fn is_raining(&self) -> bool {
        self.weather == Weather::Rain
    }
}

/// Terminal cause recorded for every death. Causes are mutually exclusive:
/// the first trigger to fire within a step wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Age exceeded the species maximum.
    OldAge,
    /// Food level reached zero.
    Starvation,
    /// Infected for the fatal number of days.
    Disease,
    /// No prey and no free adjacent cell to move into.
    Overcrowding,
    /// Killed by a predator.
    Eaten,
}

/// Infection lifecycle of an animal. Cured is terminal: a cured animal is
/// permanently immune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfectionState {
    Susceptible,
    Infected,
    Cured,
}
