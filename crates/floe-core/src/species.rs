//! Species profiles: behavior as data.
//!
//! Every organism is an `Animal` or a `Plant` whose constants come from a
//! profile looked up by species id. Adding a species is a table entry, not a
//! new type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic species identifier, compared by value. Prey relationships and
/// disease susceptibility reference species by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(String);

impl SpeciesId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpeciesId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// When during the day/night cycle an animal hunts, breeds, and moves.
/// Outside its active period an animal still ages and hungers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Diurnal,
    Nocturnal,
    Always,
}

impl Activity {
    pub fn includes(self, is_day: bool) -> bool {
        match self {
            Activity::Diurnal => is_day,
            Activity::Nocturnal => !is_day,
            Activity::Always => true,
        }
    }
}

/// Behavior constants for one animal species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalProfile {
    pub species: SpeciesId,
    /// Minimum age before breeding attempts can succeed.
    pub breeding_age: u32,
    /// Probability that a breeding attempt produces a litter.
    pub breeding_probability: f64,
    /// Litter size is drawn uniformly in [1, max_litter_size].
    pub max_litter_size: u32,
    /// Food level granted by eating one prey; also the newborn food level.
    pub food_value: i32,
    /// Exceeding this age kills the animal.
    pub max_age: u32,
    /// The single species this animal preys on, if any.
    pub prey: Option<SpeciesId>,
    /// Whether breeding requires an adjacent opposite-sex neighbor of the
    /// same species.
    pub requires_mate: bool,
    pub activity: Activity,
    /// Per-step probability that an infected animal is cured.
    pub cure_probability: f64,
    /// Exclusive upper bound for the per-organism max-infectable-neighbors
    /// draw.
    pub max_infectable: u32,
    /// Probability of seeding this species in any given cell at reset.
    pub creation_probability: f64,
}

/// Behavior constants for one plant species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantProfile {
    pub species: SpeciesId,
    pub breeding_probability: f64,
    pub max_litter_size: u32,
    /// Growth (continuous age) beyond this kills the plant.
    pub max_age: f64,
    /// Growth accumulated per acted step.
    pub growth_rate: f64,
    /// Extra growth during a rain step. Applies to that step only.
    pub rain_growth_bonus: f64,
    pub creation_probability: f64,
}

/// The full species table. Order matters: initial population seeding rolls
/// creation probabilities in table order, animals before plants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesTable {
    animals: Vec<AnimalProfile>,
    plants: Vec<PlantProfile>,
}

impl SpeciesTable {
    pub fn new(animals: Vec<AnimalProfile>, plants: Vec<PlantProfile>) -> Self {
        Self { animals, plants }
    }

    /// The Arctic Ocean cast: polar bears and seals hunting cod, whales
    /// hunting plankton, cod and plankton grazing algae.
    pub fn arctic() -> Self {
        let cod = SpeciesId::new("cod");
        let plankton = SpeciesId::new("plankton");
        let algae = SpeciesId::new("algae");

        let animals = vec![
            AnimalProfile {
                species: SpeciesId::new("polar bear"),
                breeding_age: 8,
                breeding_probability: 0.19,
                max_litter_size: 3,
                food_value: 16,
                max_age: 100,
                prey: Some(cod.clone()),
                requires_mate: true,
                activity: Activity::Diurnal,
                cure_probability: 0.0,
                max_infectable: 5,
                creation_probability: 0.05,
            },
            AnimalProfile {
                species: SpeciesId::new("seal"),
                breeding_age: 6,
                breeding_probability: 0.2,
                max_litter_size: 4,
                food_value: 17,
                max_age: 70,
                prey: Some(cod.clone()),
                requires_mate: true,
                activity: Activity::Nocturnal,
                cure_probability: 0.08,
                max_infectable: 5,
                creation_probability: 0.05,
            },
            AnimalProfile {
                species: SpeciesId::new("whale"),
                breeding_age: 8,
                breeding_probability: 0.21,
                max_litter_size: 3,
                food_value: 16,
                max_age: 120,
                prey: Some(plankton.clone()),
                requires_mate: true,
                activity: Activity::Diurnal,
                cure_probability: 0.0,
                max_infectable: 5,
                creation_probability: 0.05,
            },
            AnimalProfile {
                species: cod,
                breeding_age: 3,
                breeding_probability: 0.087,
                max_litter_size: 3,
                food_value: 8,
                max_age: 60,
                prey: Some(algae.clone()),
                requires_mate: false,
                activity: Activity::Always,
                cure_probability: 0.0,
                max_infectable: 5,
                creation_probability: 0.06,
            },
            AnimalProfile {
                species: plankton,
                breeding_age: 3,
                breeding_probability: 0.081,
                max_litter_size: 3,
                food_value: 8,
                max_age: 60,
                prey: Some(algae.clone()),
                requires_mate: false,
                activity: Activity::Always,
                cure_probability: 0.0,
                max_infectable: 5,
                creation_probability: 0.06,
            },
        ];

        let plants = vec![PlantProfile {
            species: algae,
            breeding_probability: 0.119,
            max_litter_size: 4,
            max_age: 30.0,
            growth_rate: 0.45,
            rain_growth_bonus: 0.2,
            creation_probability: 0.09,
        }];

        Self { animals, plants }
    }

    pub fn animal(&self, id: &SpeciesId) -> Option<&AnimalProfile> {
        self.animals.iter().find(|p| &p.species == id)
    }

    pub fn plant(&self, id: &SpeciesId) -> Option<&PlantProfile> {
        self.plants.iter().find(|p| &p.species == id)
    }

    pub fn animals(&self) -> &[AnimalProfile] {
        &self.animals
    }

    pub fn plants(&self) -> &[PlantProfile] {
        &self.plants
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self::arctic()
    }
}
