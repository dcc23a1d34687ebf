//! Step engine orchestrating one simulation round.
//!
//! Each round runs in strict order: advance the environment, sweep the
//! animals (disease, then action), sweep the plants, merge newborns, compact
//! the population lists, publish a snapshot. Everything that mutates across
//! organisms happens here, one organism at a time; the outcome of a step is
//! deliberately order-dependent (a predator eats prey before the prey's own
//! turn), resolved by population order alone.

use crate::disease::DiseaseTable;
use crate::environment::EnvironmentClock;
use crate::field::Field;
use crate::organism::{Animal, Organism, Plant};
use crate::snapshot::{FieldSnapshot, StatusSink, StepStatus};
use floe_core::{
    AnimalProfile, Conditions, DeathCause, Error, Location, OrganismId, PlantProfile, Result,
    SimConfig, SpeciesId, SpeciesTable,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::{debug, info};

/// One death, recorded for the step in which it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathRecord {
    pub id: OrganismId,
    pub species: SpeciesId,
    pub cause: DeathCause,
    pub step: u64,
}

/// The simulation engine: field, populations, environment, disease, and the
/// single random source every probabilistic decision draws from.
pub struct Simulation {
    field: Field,
    organisms: HashMap<OrganismId, Organism>,
    /// Animal iteration order: insertion/birth order, never spatial order.
    animal_order: Vec<OrganismId>,
    plant_order: Vec<OrganismId>,
    clock: EnvironmentClock,
    diseases: DiseaseTable,
    species: SpeciesTable,
    rng: ChaCha8Rng,
    step: u64,
    deaths: Vec<DeathRecord>,
}

impl Simulation {
    /// An engine over an empty field. Callers seed the population with
    /// `spawn_animal` / `spawn_plant`, or use `new` for a random one.
    pub fn empty(config: SimConfig) -> Self {
        let field_config = config.field.sanitized();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let clock = EnvironmentClock::new(config.environment, &mut rng);

        Self {
            field: Field::new(field_config.depth, field_config.width),
            organisms: HashMap::new(),
            animal_order: Vec::new(),
            plant_order: Vec::new(),
            clock,
            diseases: DiseaseTable::new(config.disease),
            species: config.species,
            rng,
            step: 0,
            deaths: Vec::new(),
        }
    }

    /// An engine with a randomly seeded initial population.
    pub fn new(config: SimConfig) -> Result<Self> {
        let mut simulation = Self::empty(config);
        simulation.populate()?;
        Ok(simulation)
    }

    /// Execute one simulation round.
    pub fn step(&mut self, sink: &mut impl StatusSink) -> Result<()> {
        self.clock.advance(&mut self.rng);
        self.step += 1;
        self.deaths.clear();
        let conditions = self.clock.conditions();

        let mut newborn_animals: Vec<Animal> = Vec::new();
        let mut newborn_plants: Vec<Plant> = Vec::new();

        for id in self.animal_order.clone() {
            self.process_animal(id, conditions, &mut newborn_animals)?;
        }
        for id in self.plant_order.clone() {
            self.process_plant(id, conditions, &mut newborn_plants)?;
        }

        // Newborns never act in the step they are created.
        for animal in newborn_animals {
            self.animal_order.push(animal.id);
            self.organisms.insert(animal.id, Organism::Animal(animal));
        }
        for plant in newborn_plants {
            self.plant_order.push(plant.id);
            self.organisms.insert(plant.id, Organism::Plant(plant));
        }

        self.compact();
        self.publish_status(sink);
        Ok(())
    }

    /// Clear the field and populations, seed a fresh random population, and
    /// publish a step-0 snapshot.
    pub fn reset(&mut self, sink: &mut impl StatusSink) -> Result<()> {
        self.step = 0;
        self.deaths.clear();
        self.animal_order.clear();
        self.plant_order.clear();
        self.organisms.clear();
        self.field = Field::new(self.field.depth(), self.field.width());
        self.populate()?;
        self.publish_status(sink);
        Ok(())
    }

    /// Spawn an animal of `species` at `location`. The cell must be free;
    /// placing into an occupied cell orphans the previous occupant.
    pub fn spawn_animal(
        &mut self,
        species: &SpeciesId,
        random_age: bool,
        location: Location,
    ) -> Result<OrganismId> {
        let profile = self
            .species
            .animal(species)
            .cloned()
            .ok_or_else(|| Error::UnknownSpecies(species.to_string()))?;
        let animal = Animal::new(&profile, random_age, location, &mut self.rng);
        let id = animal.id;
        self.field.place(id, location)?;
        self.animal_order.push(id);
        self.organisms.insert(id, Organism::Animal(animal));
        Ok(id)
    }

    pub fn spawn_plant(
        &mut self,
        species: &SpeciesId,
        random_age: bool,
        location: Location,
    ) -> Result<OrganismId> {
        let profile = self
            .species
            .plant(species)
            .cloned()
            .ok_or_else(|| Error::UnknownSpecies(species.to_string()))?;
        let plant = Plant::new(&profile, random_age, location, &mut self.rng);
        let id = plant.id;
        self.field.place(id, location)?;
        self.plant_order.push(id);
        self.organisms.insert(id, Organism::Plant(plant));
        Ok(id)
    }

    /// Publish the current state to `sink`. Called at the end of every step
    /// and at reset.
    pub fn publish_status(&self, sink: &mut impl StatusSink) {
        let status = StepStatus {
            step: self.step,
            snapshot: self.snapshot(),
            weather: self.clock.weather(),
            is_day: self.clock.is_day(),
            temperature: self.clock.temperature(),
        };
        sink.publish(&status);
    }

    /// An owned copy of the current field contents.
    pub fn snapshot(&self) -> FieldSnapshot {
        let depth = self.field.depth();
        let width = self.field.width();
        let mut cells = Vec::with_capacity((depth * width) as usize);
        for row in 0..depth {
            for col in 0..width {
                let species = self
                    .field
                    .occupant_at(Location::new(row, col))
                    .and_then(|id| self.organisms.get(&id))
                    .filter(|organism| organism.is_alive())
                    .map(|organism| organism.species().clone());
                cells.push(species);
            }
        }
        FieldSnapshot::new(depth, width, cells)
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    pub fn conditions(&self) -> Conditions {
        self.clock.conditions()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn organism(&self, id: &OrganismId) -> Option<&Organism> {
        self.organisms.get(id)
    }

    pub fn animal_count(&self) -> usize {
        self.animal_order.len()
    }

    pub fn plant_count(&self) -> usize {
        self.plant_order.len()
    }

    /// Deaths recorded during the most recent step, in population order.
    pub fn death_log(&self) -> &[DeathRecord] {
        &self.deaths
    }

    /// Seed the initial population: every cell rolls each profile's
    /// creation probability in table order, animals before plants, first
    /// success claiming the cell with a random-age organism.
    fn populate(&mut self) -> Result<()> {
        let animal_species: Vec<(SpeciesId, f64)> = self
            .species
            .animals()
            .iter()
            .map(|p| (p.species.clone(), p.creation_probability))
            .collect();
        let plant_species: Vec<(SpeciesId, f64)> = self
            .species
            .plants()
            .iter()
            .map(|p| (p.species.clone(), p.creation_probability))
            .collect();

        for row in 0..self.field.depth() {
            for col in 0..self.field.width() {
                let location = Location::new(row, col);
                let mut seeded = false;
                for (species, probability) in &animal_species {
                    if self.rng.gen::<f64>() <= *probability {
                        self.spawn_animal(species, true, location)?;
                        seeded = true;
                        break;
                    }
                }
                if seeded {
                    continue;
                }
                for (species, probability) in &plant_species {
                    if self.rng.gen::<f64>() <= *probability {
                        self.spawn_plant(species, true, location)?;
                        break;
                    }
                }
            }
        }

        info!(
            animals = self.animal_order.len(),
            plants = self.plant_order.len(),
            "seeded initial population"
        );
        Ok(())
    }

    fn process_animal(
        &mut self,
        id: OrganismId,
        conditions: Conditions,
        births: &mut Vec<Animal>,
    ) -> Result<()> {
        {
            let Some(Organism::Animal(animal)) = self.organisms.get_mut(&id) else {
                return Ok(());
            };
            // Eaten earlier in this sweep.
            if !animal.is_alive() {
                return Ok(());
            }
            if animal.can_be_infected() {
                self.diseases.try_initial_infection(animal, &mut self.rng);
            }
        }

        self.diseases.advance_infection(
            id,
            &mut self.organisms,
            &mut self.field,
            &self.species,
            &mut self.rng,
        );

        let profile = {
            let Some(Organism::Animal(animal)) = self.organisms.get(&id) else {
                return Ok(());
            };
            // A disease death overrides everything else this step.
            if !animal.is_alive() {
                return Ok(());
            }
            self.species
                .animal(&animal.species)
                .cloned()
                .ok_or_else(|| Error::UnknownSpecies(animal.species.to_string()))?
        };

        self.animal_action(id, &profile, conditions, births)
    }

    fn animal_action(
        &mut self,
        id: OrganismId,
        profile: &AnimalProfile,
        conditions: Conditions,
        births: &mut Vec<Animal>,
    ) -> Result<()> {
        {
            let Some(Organism::Animal(animal)) = self.organisms.get_mut(&id) else {
                return Ok(());
            };
            animal.increment_age(profile, &mut self.field);
            if !animal.is_alive() {
                return Ok(());
            }
            animal.increment_hunger(&mut self.field);
            if !animal.is_alive() {
                return Ok(());
            }
        }

        // Snow overrides day and night: age and hunger only.
        if conditions.is_snowing() {
            return Ok(());
        }
        // Outside its active period an animal neither breeds nor moves.
        if !profile.activity.includes(conditions.is_day) {
            return Ok(());
        }

        self.give_birth(id, profile, births)?;

        let Some(location) = self.organisms.get(&id).and_then(|o| o.location()) else {
            return Ok(());
        };

        if let Some((prey_id, prey_location)) = self.find_food(profile, location) {
            if let Some(prey) = self.organisms.get_mut(&prey_id) {
                prey.set_dead(DeathCause::Eaten, &mut self.field);
            }
            let Some(Organism::Animal(animal)) = self.organisms.get_mut(&id) else {
                return Ok(());
            };
            animal.food_level = profile.food_value;
            animal.relocate(&mut self.field, prey_location)?;
        } else if let Some(free) = self.field.any_free_adjacent_location(location) {
            let Some(Organism::Animal(animal)) = self.organisms.get_mut(&id) else {
                return Ok(());
            };
            animal.relocate(&mut self.field, free)?;
        } else {
            // Neither food nor space.
            let Some(Organism::Animal(animal)) = self.organisms.get_mut(&id) else {
                return Ok(());
            };
            animal.set_dead(DeathCause::Overcrowding, &mut self.field);
        }

        Ok(())
    }

    /// Scan adjacent cells in field order; the first live occupant of the
    /// profile's prey species is the meal.
    fn find_food(
        &self,
        profile: &AnimalProfile,
        location: Location,
    ) -> Option<(OrganismId, Location)> {
        let prey_species = profile.prey.as_ref()?;
        for adjacent in self.field.adjacent_locations(location) {
            if let Some(occupant_id) = self.field.occupant_at(adjacent) {
                if let Some(occupant) = self.organisms.get(&occupant_id) {
                    if occupant.is_alive() && occupant.species() == prey_species {
                        return Some((occupant_id, adjacent));
                    }
                }
            }
        }
        None
    }

    fn has_adjacent_mate(&self, location: Location, species: &SpeciesId, female: bool) -> bool {
        for adjacent in self.field.adjacent_locations(location) {
            if let Some(occupant_id) = self.field.occupant_at(adjacent) {
                if let Some(Organism::Animal(other)) = self.organisms.get(&occupant_id) {
                    if other.is_alive() && &other.species == species && other.female != female {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn give_birth(
        &mut self,
        id: OrganismId,
        profile: &AnimalProfile,
        births: &mut Vec<Animal>,
    ) -> Result<()> {
        let (location, age, female) = {
            let Some(Organism::Animal(animal)) = self.organisms.get(&id) else {
                return Ok(());
            };
            let Some(location) = animal.location() else {
                return Ok(());
            };
            (location, animal.age, animal.female)
        };

        let mut free = self.field.free_adjacent_locations(location);

        // Litter roll before the mate scan, preserving the original draw
        // order.
        let litter = if age >= profile.breeding_age
            && self.rng.gen::<f64>() <= profile.breeding_probability
            && profile.max_litter_size > 0
        {
            self.rng.gen_range(1..=profile.max_litter_size)
        } else {
            0
        };
        if litter == 0 {
            return Ok(());
        }
        // No opposite-sex neighbor means zero births, whatever the roll.
        if profile.requires_mate && !self.has_adjacent_mate(location, &profile.species, female) {
            return Ok(());
        }

        for _ in 0..litter {
            if free.is_empty() {
                break; // remaining litter is discarded
            }
            let birth_location = free.remove(0);
            let newborn = Animal::new(profile, false, birth_location, &mut self.rng);
            self.field.place(newborn.id, birth_location)?;
            births.push(newborn);
        }
        Ok(())
    }

    fn process_plant(
        &mut self,
        id: OrganismId,
        conditions: Conditions,
        births: &mut Vec<Plant>,
    ) -> Result<()> {
        let profile = {
            let Some(Organism::Plant(plant)) = self.organisms.get(&id) else {
                return Ok(());
            };
            if !plant.is_alive() {
                return Ok(());
            }
            self.species
                .plant(&plant.species)
                .cloned()
                .ok_or_else(|| Error::UnknownSpecies(plant.species.to_string()))?
        };

        // The rain bonus applies to this step only; the effective rate is
        // recomputed from the profile every action.
        let rate = if conditions.is_raining() {
            profile.growth_rate + profile.rain_growth_bonus
        } else {
            profile.growth_rate
        };

        {
            let Some(Organism::Plant(plant)) = self.organisms.get_mut(&id) else {
                return Ok(());
            };
            plant.grow(rate, &profile, &mut self.field);
            if !plant.is_alive() {
                return Ok(());
            }
        }

        if conditions.is_snowing() {
            return Ok(());
        }
        self.sprout(id, &profile, births)
    }

    fn sprout(
        &mut self,
        id: OrganismId,
        profile: &PlantProfile,
        births: &mut Vec<Plant>,
    ) -> Result<()> {
        let Some(location) = self.organisms.get(&id).and_then(|o| o.location()) else {
            return Ok(());
        };
        let mut free = self.field.free_adjacent_locations(location);

        let litter = if self.rng.gen::<f64>() <= profile.breeding_probability
            && profile.max_litter_size > 0
        {
            self.rng.gen_range(1..=profile.max_litter_size)
        } else {
            0
        };

        for _ in 0..litter {
            if free.is_empty() {
                break;
            }
            let birth_location = free.remove(0);
            let sprouted = Plant::new(profile, false, birth_location, &mut self.rng);
            self.field.place(sprouted.id, birth_location)?;
            births.push(sprouted);
        }
        Ok(())
    }

    /// Drop dead entries from both population lists and the organism map,
    /// recording each death with its cause.
    fn compact(&mut self) {
        let step = self.step;
        let Self {
            organisms,
            animal_order,
            plant_order,
            deaths,
            ..
        } = self;

        let mut drop_dead = |order: &mut Vec<OrganismId>| {
            order.retain(|id| {
                let alive = organisms.get(id).map(|o| o.is_alive()).unwrap_or(false);
                if !alive {
                    if let Some(dead) = organisms.remove(id) {
                        if let Some(cause) = dead.death_cause() {
                            debug!(
                                organism = %id,
                                species = %dead.species(),
                                cause = ?cause,
                                step,
                                "organism died"
                            );
                            deaths.push(DeathRecord {
                                id: *id,
                                species: dead.species().clone(),
                                cause,
                                step,
                            });
                        }
                    }
                }
                alive
            });
        };
        drop_dead(animal_order);
        drop_dead(plant_order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::NullSink;
    use floe_core::{
        Activity, DiseaseConfig, DiseaseProfile, EnvironmentConfig, FieldConfig, InfectionState,
        Weather,
    };

    fn animal_profile(name: &str) -> AnimalProfile {
        AnimalProfile {
            species: SpeciesId::new(name),
            breeding_age: 0,
            breeding_probability: 0.0,
            max_litter_size: 3,
            food_value: 100,
            max_age: 1000,
            prey: None,
            requires_mate: false,
            activity: Activity::Always,
            cure_probability: 0.0,
            max_infectable: 5,
            creation_probability: 0.0,
        }
    }

    /// Non-clear weather is always rain, so nothing ever hibernates.
    fn never_snowing() -> EnvironmentConfig {
        EnvironmentConfig {
            snow_threshold: -1,
            ..Default::default()
        }
    }

    fn config_with(species: SpeciesTable, depth: i32, width: i32) -> SimConfig {
        SimConfig {
            seed: 99,
            field: FieldConfig { depth, width },
            environment: never_snowing(),
            disease: DiseaseConfig {
                diseases: vec![],
                fatal_days: 5,
            },
            species,
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        statuses: Vec<StepStatus>,
    }

    impl StatusSink for RecordingSink {
        fn publish(&mut self, status: &StepStatus) {
            self.statuses.push(status.clone());
        }
    }

    #[test]
    fn test_one_by_one_field_plant_lifecycle() {
        let moss = PlantProfile {
            species: SpeciesId::new("moss"),
            breeding_probability: 1.0,
            max_litter_size: 4,
            max_age: 1.0,
            growth_rate: 1.0,
            rain_growth_bonus: 0.0,
            creation_probability: 0.0,
        };
        let table = SpeciesTable::new(vec![], vec![moss]);
        let mut sim = Simulation::empty(config_with(table, 1, 1));
        sim.spawn_plant(&SpeciesId::new("moss"), false, Location::new(0, 0))
            .unwrap();

        let mut sink = NullSink;
        sim.step(&mut sink).unwrap();
        // Growth 1.0 is not past a max age of 1.0, and the certain breeding
        // roll had no free adjacent cell, so the litter was discarded.
        assert_eq!(sim.plant_count(), 1);

        sim.step(&mut sink).unwrap();
        assert_eq!(sim.plant_count(), 0);
        assert_eq!(sim.death_log().len(), 1);
        assert_eq!(sim.death_log()[0].cause, DeathCause::OldAge);
    }

    #[test]
    fn test_starvation_fires_before_overcrowding() {
        let mut profile = animal_profile("walrus");
        profile.food_value = 1;
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut sim = Simulation::empty(config_with(table, 1, 1));
        sim.spawn_animal(&SpeciesId::new("walrus"), false, Location::new(0, 0))
            .unwrap();

        sim.step(&mut NullSink).unwrap();
        assert_eq!(sim.animal_count(), 0);
        assert_eq!(sim.death_log()[0].cause, DeathCause::Starvation);
    }

    #[test]
    fn test_overcrowding_when_fed_but_boxed_in() {
        let mut profile = animal_profile("walrus");
        profile.food_value = 2;
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut sim = Simulation::empty(config_with(table, 1, 1));
        sim.spawn_animal(&SpeciesId::new("walrus"), false, Location::new(0, 0))
            .unwrap();

        sim.step(&mut NullSink).unwrap();
        assert_eq!(sim.animal_count(), 0);
        assert_eq!(sim.death_log()[0].cause, DeathCause::Overcrowding);
    }

    #[test]
    fn test_no_births_when_probability_is_zero() {
        let profile = animal_profile("walrus");
        let species = SpeciesId::new("walrus");
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut sim = Simulation::empty(config_with(table, 10, 10));
        for location in [
            Location::new(0, 0),
            Location::new(2, 3),
            Location::new(4, 6),
            Location::new(6, 9),
            Location::new(8, 1),
        ] {
            sim.spawn_animal(&species, false, location).unwrap();
        }

        for _ in 0..50 {
            sim.step(&mut NullSink).unwrap();
            assert!(sim.animal_count() <= 5, "population may never grow");
        }
    }

    #[test]
    fn test_infection_fatal_on_fifth_day() {
        let mut profile = animal_profile("harbor seal");
        profile.requires_mate = true; // keeps the animal alone
        let species = SpeciesId::new("harbor seal");
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut config = config_with(table, 2, 2);
        config.disease = DiseaseConfig {
            diseases: vec![DiseaseProfile {
                name: "PDH".to_string(),
                infection_probability: 1.0,
                susceptible: vec![species.clone()],
            }],
            fatal_days: 5,
        };
        let mut sim = Simulation::empty(config);
        let id = sim
            .spawn_animal(&species, false, Location::new(0, 0))
            .unwrap();

        for day in 1..=4u32 {
            sim.step(&mut NullSink).unwrap();
            let animal = sim.organism(&id).and_then(|o| o.as_animal()).unwrap();
            assert!(animal.is_alive(), "alive through infected day {day}");
            assert_eq!(animal.infection, InfectionState::Infected);
            assert_eq!(animal.infected_days, day);
        }

        sim.step(&mut NullSink).unwrap();
        assert!(sim.organism(&id).is_none());
        assert_eq!(sim.death_log().len(), 1);
        assert_eq!(sim.death_log()[0].cause, DeathCause::Disease);
    }

    #[test]
    fn test_predator_eats_first_prey_in_scan_order() {
        let mut hunter = animal_profile("orca");
        hunter.prey = Some(SpeciesId::new("fish"));
        hunter.food_value = 10;
        let fish = animal_profile("fish");
        let table = SpeciesTable::new(vec![hunter, fish], vec![]);
        let mut sim = Simulation::empty(config_with(table, 3, 3));

        let hunter_id = sim
            .spawn_animal(&SpeciesId::new("orca"), false, Location::new(1, 1))
            .unwrap();
        let first_prey = sim
            .spawn_animal(&SpeciesId::new("fish"), false, Location::new(0, 0))
            .unwrap();
        let second_prey = sim
            .spawn_animal(&SpeciesId::new("fish"), false, Location::new(0, 1))
            .unwrap();

        sim.step(&mut NullSink).unwrap();

        // Row-major scan order finds (0, 0) first.
        assert!(sim.organism(&first_prey).is_none());
        assert!(sim.organism(&second_prey).is_some());
        let hunter = sim.organism(&hunter_id).and_then(|o| o.as_animal()).unwrap();
        assert_eq!(hunter.location(), Some(Location::new(0, 0)));
        assert_eq!(hunter.food_level, 10, "food resets to the profile value");
        assert_eq!(sim.death_log().len(), 1);
        assert_eq!(sim.death_log()[0].cause, DeathCause::Eaten);
    }

    #[test]
    fn test_prey_consumed_at_most_once_per_sweep() {
        let mut hunter = animal_profile("orca");
        hunter.prey = Some(SpeciesId::new("fish"));
        hunter.food_value = 10;
        let fish = animal_profile("fish");
        let table = SpeciesTable::new(vec![hunter, fish], vec![]);
        let mut sim = Simulation::empty(config_with(table, 3, 3));

        let first_hunter = sim
            .spawn_animal(&SpeciesId::new("orca"), false, Location::new(1, 0))
            .unwrap();
        let second_hunter = sim
            .spawn_animal(&SpeciesId::new("orca"), false, Location::new(1, 2))
            .unwrap();
        sim.spawn_animal(&SpeciesId::new("fish"), false, Location::new(1, 1))
            .unwrap();

        sim.step(&mut NullSink).unwrap();

        assert_eq!(sim.death_log().len(), 1, "one prey feeds one predator");
        assert_eq!(sim.death_log()[0].cause, DeathCause::Eaten);
        let first = sim
            .organism(&first_hunter)
            .and_then(|o| o.as_animal())
            .unwrap();
        let second = sim
            .organism(&second_hunter)
            .and_then(|o| o.as_animal())
            .unwrap();
        assert_eq!(first.food_level, 10, "the first hunter ate");
        assert_eq!(second.food_level, 9, "the second hunter only hungered");
    }

    #[test]
    fn test_births_fill_free_cells_without_overwriting() {
        let mut profile = animal_profile("lemming");
        profile.breeding_probability = 1.0;
        profile.max_litter_size = 4;
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut sim = Simulation::empty(config_with(table, 3, 3));
        sim.spawn_animal(&SpeciesId::new("lemming"), false, Location::new(1, 1))
            .unwrap();

        sim.step(&mut NullSink).unwrap();

        let count = sim.animal_count();
        assert!(
            (2..=5).contains(&count),
            "one parent plus a litter of 1..=4, got {count}"
        );
        // Each organism holds its own cell: no birth overwrote a live
        // occupant and no two siblings share a coordinate.
        assert_eq!(sim.field().occupied_cells(), count);
    }

    #[test]
    fn test_mate_required_blocks_solo_breeding() {
        let mut profile = animal_profile("narwhal");
        profile.breeding_probability = 1.0;
        profile.requires_mate = true;
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut sim = Simulation::empty(config_with(table, 3, 3));
        sim.spawn_animal(&SpeciesId::new("narwhal"), false, Location::new(1, 1))
            .unwrap();

        for _ in 0..10 {
            sim.step(&mut NullSink).unwrap();
            assert_eq!(sim.animal_count(), 1, "no births without a mate");
        }
    }

    #[test]
    fn test_breeding_requires_opposite_sex_neighbor() {
        let mut profile = animal_profile("narwhal");
        profile.breeding_probability = 1.0;
        profile.max_litter_size = 2;
        profile.requires_mate = true;
        let species = SpeciesId::new("narwhal");
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut sim = Simulation::empty(config_with(table, 3, 4));

        let a = sim.spawn_animal(&species, false, Location::new(1, 1)).unwrap();
        let b = sim.spawn_animal(&species, false, Location::new(1, 2)).unwrap();
        let differ = {
            let a = sim.organism(&a).and_then(|o| o.as_animal()).unwrap();
            let b = sim.organism(&b).and_then(|o| o.as_animal()).unwrap();
            a.female != b.female
        };

        sim.step(&mut NullSink).unwrap();

        if differ {
            assert!(sim.animal_count() > 2, "an adjacent pair breeds");
        } else {
            assert_eq!(sim.animal_count(), 2, "a same-sex pair does not breed");
        }
    }

    #[test]
    fn test_nocturnal_animals_rest_during_the_day() {
        let mut profile = animal_profile("night seal");
        profile.breeding_probability = 1.0;
        profile.activity = Activity::Nocturnal;
        let species = SpeciesId::new("night seal");
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut sim = Simulation::empty(config_with(table, 5, 5));
        let id = sim
            .spawn_animal(&species, false, Location::new(2, 2))
            .unwrap();

        // Steps 1-6 run in daytime: the nocturnal animal ages and hungers
        // but never moves or breeds.
        for step in 1..=6u32 {
            sim.step(&mut NullSink).unwrap();
            assert!(sim.conditions().is_day);
            assert_eq!(sim.animal_count(), 1);
            let animal = sim.organism(&id).and_then(|o| o.as_animal()).unwrap();
            assert_eq!(animal.location(), Some(Location::new(2, 2)));
            assert_eq!(animal.age, step);
        }

        // The clock flips before actions on step 7: first night step.
        sim.step(&mut NullSink).unwrap();
        assert!(!sim.conditions().is_day);
        assert!(sim.animal_count() > 1, "it breeds at night");
        let animal = sim.organism(&id).and_then(|o| o.as_animal()).unwrap();
        assert_ne!(animal.location(), Some(Location::new(2, 2)), "it moves at night");
    }

    #[test]
    fn test_snow_pauses_everything_but_aging() {
        let build = |seed: u64| {
            let mut hunter = animal_profile("orca");
            hunter.prey = Some(SpeciesId::new("fish"));
            hunter.food_value = 10;
            hunter.breeding_probability = 1.0;
            let fish = animal_profile("fish");
            let table = SpeciesTable::new(vec![hunter, fish], vec![]);
            let config = SimConfig {
                seed,
                field: FieldConfig { depth: 3, width: 3 },
                environment: EnvironmentConfig {
                    // Weather holds for the whole test; non-clear is snow.
                    change_period: 1000,
                    max_temperature: 40,
                    snow_threshold: 40,
                },
                disease: DiseaseConfig {
                    diseases: vec![],
                    fatal_days: 5,
                },
                species: table,
                ..Default::default()
            };
            Simulation::empty(config)
        };

        // Find a seed whose initial roll is snow.
        let mut sim = (0..100u64)
            .map(build)
            .find(|s| s.conditions().weather == Weather::Snow)
            .expect("some seed rolls snow");

        let hunter_id = sim
            .spawn_animal(&SpeciesId::new("orca"), false, Location::new(1, 1))
            .unwrap();
        sim.spawn_animal(&SpeciesId::new("fish"), false, Location::new(0, 0))
            .unwrap();

        sim.step(&mut NullSink).unwrap();

        assert_eq!(sim.animal_count(), 2, "no hunting, no births under snow");
        let hunter = sim.organism(&hunter_id).and_then(|o| o.as_animal()).unwrap();
        assert_eq!(hunter.location(), Some(Location::new(1, 1)));
        assert_eq!(hunter.age, 1, "aging continues under snow");
        assert_eq!(hunter.food_level, 9, "hunger continues under snow");
    }

    #[test]
    fn test_status_published_every_step() {
        let config = SimConfig {
            seed: 11,
            field: FieldConfig {
                depth: 10,
                width: 10,
            },
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        let mut sink = RecordingSink::default();

        for _ in 0..3 {
            sim.step(&mut sink).unwrap();
        }

        let steps: Vec<u64> = sink.statuses.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
        assert!(sink.statuses[0].is_day);
        let last = sink.statuses.last().unwrap();
        assert_eq!(last.weather, sim.conditions().weather);
        assert_eq!(last.snapshot, sim.snapshot());
    }

    #[test]
    fn test_reset_reseeds_and_publishes_step_zero() {
        let config = SimConfig {
            seed: 5,
            field: FieldConfig {
                depth: 20,
                width: 20,
            },
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        assert!(sim.snapshot().total_population() > 0);

        for _ in 0..5 {
            sim.step(&mut NullSink).unwrap();
        }

        let mut sink = RecordingSink::default();
        sim.reset(&mut sink).unwrap();
        assert_eq!(sim.current_step(), 0);
        assert!(sim.snapshot().total_population() > 0);
        assert_eq!(sink.statuses.len(), 1);
        assert_eq!(sink.statuses[0].step, 0);
    }

    #[test]
    fn test_identical_seeds_produce_identical_runs() {
        let config = SimConfig {
            seed: 7,
            field: FieldConfig {
                depth: 15,
                width: 15,
            },
            ..Default::default()
        };
        let mut a = Simulation::new(config.clone()).unwrap();
        let mut b = Simulation::new(config).unwrap();

        for _ in 0..25 {
            a.step(&mut NullSink).unwrap();
            b.step(&mut NullSink).unwrap();
            assert_eq!(a.snapshot(), b.snapshot());
            assert_eq!(a.conditions(), b.conditions());
        }
    }

    #[test]
    fn test_disease_spreads_between_adjacent_animals() {
        let profile = animal_profile("harbor seal");
        let species = SpeciesId::new("harbor seal");
        let table = SpeciesTable::new(vec![profile], vec![]);
        let mut config = config_with(table, 5, 5);
        config.disease = DiseaseConfig {
            diseases: vec![DiseaseProfile {
                name: "PDH".to_string(),
                infection_probability: 1.0,
                susceptible: vec![species.clone()],
            }],
            fatal_days: 5,
        };
        let mut sim = Simulation::empty(config);
        let a = sim.spawn_animal(&species, false, Location::new(2, 2)).unwrap();
        let b = sim.spawn_animal(&species, false, Location::new(2, 3)).unwrap();

        sim.step(&mut NullSink).unwrap();

        // With a certain infection probability both end the step infected,
        // and each has advanced its own clock exactly once.
        for id in [a, b] {
            let animal = sim.organism(&id).and_then(|o| o.as_animal()).unwrap();
            assert_eq!(animal.infection, InfectionState::Infected);
            assert_eq!(animal.infected_days, 1);
        }
    }
}
