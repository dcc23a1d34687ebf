//! Configuration types for the simulation.

use crate::species::{SpeciesId, SpeciesTable};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Number of rows. Must be greater than zero.
    pub depth: i32,
    /// Number of columns. Must be greater than zero.
    pub width: i32,
}

impl FieldConfig {
    /// Replace non-positive dimensions with the defaults. Invalid dimensions
    /// are a configuration mistake, recovered here rather than failing the
    /// run.
    pub fn sanitized(self) -> Self {
        if self.depth <= 0 || self.width <= 0 {
            warn!(
                depth = self.depth,
                width = self.width,
                "field dimensions must be greater than zero, using defaults"
            );
            Self::default()
        } else {
            self
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            depth: 160,
            width: 240,
        }
    }
}

/// Day/night and weather cadence parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Steps between day/night flips and weather re-rolls.
    pub change_period: u32,
    /// Temperature is drawn uniformly in [0, max_temperature).
    pub max_temperature: i32,
    /// At or below this temperature, non-clear weather is snow; above, rain.
    pub snow_threshold: i32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            change_period: 7,
            max_temperature: 40,
            snow_threshold: 20,
        }
    }
}

/// One disease: which species it can infect, and how readily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseProfile {
    pub name: String,
    /// Probability per opportunity of infecting a susceptible animal.
    pub infection_probability: f64,
    pub susceptible: Vec<SpeciesId>,
}

/// Disease dynamics shared by all diseases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseConfig {
    pub diseases: Vec<DiseaseProfile>,
    /// An animal infected for this many days dies, cure or not.
    pub fatal_days: u32,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            diseases: vec![DiseaseProfile {
                name: "PDH".to_string(),
                infection_probability: 0.03,
                susceptible: vec![SpeciesId::new("seal")],
            }],
            fatal_days: 5,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Step budget for the driver loop. The engine itself never terminates.
    pub num_steps: u64,
    pub field: FieldConfig,
    pub environment: EnvironmentConfig,
    pub disease: DiseaseConfig,
    pub species: SpeciesTable,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_steps: 500,
            field: FieldConfig::default(),
            environment: EnvironmentConfig::default(),
            disease: DiseaseConfig::default(),
            species: SpeciesTable::default(),
        }
    }
}
