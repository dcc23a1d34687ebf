//! Organism state: one animal type and one plant type, parameterized by
//! species profiles.
//!
//! Structs here hold per-entity state and its small mutators; everything
//! that crosses organisms (feeding, breeding, infection spread) lives in the
//! step engine.

use crate::field::Field;
use floe_core::{
    AnimalProfile, DeathCause, InfectionState, Location, OrganismId, PlantProfile, Result,
    SpeciesId,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// An animal on the field.
#[derive(Debug, Clone)]
pub struct Animal {
    pub id: OrganismId,
    pub species: SpeciesId,
    pub age: u32,
    /// Steps remaining before starvation; reset by eating.
    pub food_level: i32,
    pub female: bool,
    pub infection: InfectionState,
    /// Consecutive steps spent infected.
    pub infected_days: u32,
    /// How many neighbors this animal can expose per spread attempt.
    pub max_infectable: u32,
    alive: bool,
    location: Option<Location>,
    death_cause: Option<DeathCause>,
}

impl Animal {
    /// Create an animal of the given species. `random_age` seeds age and
    /// food level uniformly below their maxima (initial population);
    /// otherwise the animal is a newborn with age 0 and a full food level.
    ///
    /// Draw order is fixed: sex, infection bound, then (if random) age and
    /// food level.
    pub fn new(
        profile: &AnimalProfile,
        random_age: bool,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let female = rng.gen::<bool>();
        let max_infectable = if profile.max_infectable > 0 {
            rng.gen_range(0..profile.max_infectable)
        } else {
            0
        };
        let (age, food_level) = if random_age {
            let age = if profile.max_age > 0 {
                rng.gen_range(0..profile.max_age)
            } else {
                0
            };
            let food = if profile.food_value > 0 {
                rng.gen_range(0..profile.food_value)
            } else {
                0
            };
            (age, food)
        } else {
            (0, profile.food_value)
        };

        Self {
            id: OrganismId::new(),
            species: profile.species.clone(),
            age,
            food_level,
            female,
            infection: InfectionState::Susceptible,
            infected_days: 0,
            max_infectable,
            alive: true,
            location: Some(location),
            death_cause: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    /// Age by one step. Exceeding the species maximum kills immediately,
    /// before anything else the animal would do this step.
    pub fn increment_age(&mut self, profile: &AnimalProfile, field: &mut Field) {
        self.age += 1;
        if self.age > profile.max_age {
            self.set_dead(DeathCause::OldAge, field);
        }
    }

    /// Grow hungrier by one step. Reaching zero kills.
    pub fn increment_hunger(&mut self, field: &mut Field) {
        self.food_level -= 1;
        if self.food_level <= 0 {
            self.set_dead(DeathCause::Starvation, field);
        }
    }

    pub fn can_be_infected(&self) -> bool {
        self.infection == InfectionState::Susceptible
    }

    /// Transition susceptible -> infected. Infected and cured animals never
    /// transition again.
    pub fn infect(&mut self) {
        if self.infection == InfectionState::Susceptible {
            self.infection = InfectionState::Infected;
        }
    }

    /// Transition infected -> cured. Cured is permanent immunity.
    pub fn cure(&mut self) {
        if self.infection == InfectionState::Infected {
            self.infection = InfectionState::Cured;
        }
    }

    /// Move to `new_location`: clear the old cell, then claim the new one.
    pub fn relocate(&mut self, field: &mut Field, new_location: Location) -> Result<()> {
        if let Some(old) = self.location {
            field.clear(old);
        }
        field.place(self.id, new_location)?;
        self.location = Some(new_location);
        Ok(())
    }

    /// Mark dead with `cause` and detach from the field. Only the first
    /// cause is recorded.
    pub fn set_dead(&mut self, cause: DeathCause, field: &mut Field) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.death_cause = Some(cause);
        if let Some(location) = self.location.take() {
            field.clear(location);
        }
    }
}

/// A plant on the field. Plants do not move, hunger, or sicken; they grow
/// continuously and sprout offspring.
#[derive(Debug, Clone)]
pub struct Plant {
    pub id: OrganismId,
    pub species: SpeciesId,
    /// Continuous age, accumulated as growth per acted step.
    pub growth: f64,
    alive: bool,
    location: Option<Location>,
    death_cause: Option<DeathCause>,
}

impl Plant {
    pub fn new(
        profile: &PlantProfile,
        random_age: bool,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let growth = if random_age && profile.max_age >= 1.0 {
            rng.gen_range(0..profile.max_age as u32) as f64
        } else {
            0.0
        };

        Self {
            id: OrganismId::new(),
            species: profile.species.clone(),
            growth,
            alive: true,
            location: Some(location),
            death_cause: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    /// Accumulate one step of growth at `rate`. Exceeding the species
    /// maximum age kills immediately.
    pub fn grow(&mut self, rate: f64, profile: &PlantProfile, field: &mut Field) {
        self.growth += rate;
        if self.growth > profile.max_age {
            self.set_dead(DeathCause::OldAge, field);
        }
    }

    pub fn set_dead(&mut self, cause: DeathCause, field: &mut Field) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.death_cause = Some(cause);
        if let Some(location) = self.location.take() {
            field.clear(location);
        }
    }
}

/// Either kind of organism; a field cell may hold one of either.
#[derive(Debug, Clone)]
pub enum Organism {
    Animal(Animal),
    Plant(Plant),
}

impl Organism {
    pub fn id(&self) -> OrganismId {
        match self {
            Organism::Animal(a) => a.id,
            Organism::Plant(p) => p.id,
        }
    }

    pub fn species(&self) -> &SpeciesId {
        match self {
            Organism::Animal(a) => &a.species,
            Organism::Plant(p) => &p.species,
        }
    }

    pub fn is_alive(&self) -> bool {
        match self {
            Organism::Animal(a) => a.is_alive(),
            Organism::Plant(p) => p.is_alive(),
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            Organism::Animal(a) => a.location(),
            Organism::Plant(p) => p.location(),
        }
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        match self {
            Organism::Animal(a) => a.death_cause(),
            Organism::Plant(p) => p.death_cause(),
        }
    }

    pub fn set_dead(&mut self, cause: DeathCause, field: &mut Field) {
        match self {
            Organism::Animal(a) => a.set_dead(cause, field),
            Organism::Plant(p) => p.set_dead(cause, field),
        }
    }

    pub fn as_animal(&self) -> Option<&Animal> {
        match self {
            Organism::Animal(a) => Some(a),
            Organism::Plant(_) => None,
        }
    }

    pub fn as_animal_mut(&mut self) -> Option<&mut Animal> {
        match self {
            Organism::Animal(a) => Some(a),
            Organism::Plant(_) => None,
        }
    }

    pub fn as_plant(&self) -> Option<&Plant> {
        match self {
            Organism::Animal(_) => None,
            Organism::Plant(p) => Some(p),
        }
    }
}
