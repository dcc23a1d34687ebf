//! Error types for the simulator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A coordinate outside the field dimensions. Adjacency queries only
    /// yield in-bounds locations, so seeing this means a defect in the
    /// caller, not a recoverable condition.
    #[error("location ({row}, {col}) is outside the {depth}x{width} field")]
    OutOfBounds {
        row: i32,
        col: i32,
        depth: i32,
        width: i32,
    },

    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
