//! World simulation engine.
//!
//! This crate implements the bounded 2D field where organisms live, hunt,
//! breed, sicken, and die, stepped forward in synchronized rounds under
//! day/night and weather conditions.

pub mod disease;
pub mod environment;
pub mod field;
pub mod organism;
pub mod simulation;
pub mod snapshot;

pub use disease::DiseaseTable;
pub use environment::EnvironmentClock;
pub use field::Field;
pub use organism::{Animal, Organism, Plant};
pub use simulation::{DeathRecord, Simulation};
pub use snapshot::{FieldSnapshot, NullSink, StatusSink, StepStatus};
