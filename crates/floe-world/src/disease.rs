//! Disease dynamics layered onto animals.

use crate::field::Field;
use crate::organism::{Animal, Organism};
use floe_core::{DeathCause, DiseaseConfig, DiseaseProfile, InfectionState, OrganismId, SpeciesTable};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::debug;

/// The set of diseases in play and the shared fatality rule.
#[derive(Debug, Clone)]
pub struct DiseaseTable {
    diseases: Vec<DiseaseProfile>,
    fatal_days: u32,
}

impl DiseaseTable {
    pub fn new(config: DiseaseConfig) -> Self {
        Self {
            diseases: config.diseases,
            fatal_days: config.fatal_days,
        }
    }

    pub fn fatal_days(&self) -> u32 {
        self.fatal_days
    }

    /// Roll the infect-or-not decision for a susceptible animal: the first
    /// disease that lists the species and wins its probability roll infects.
    /// Infected and cured animals are never touched.
    pub fn try_initial_infection(&self, animal: &mut Animal, rng: &mut ChaCha8Rng) -> bool {
        if !animal.can_be_infected() {
            return false;
        }
        for disease in &self.diseases {
            if disease.susceptible.contains(&animal.species)
                && rng.gen::<f64>() < disease.infection_probability
            {
                animal.infect();
                debug!(animal = %animal.id, species = %animal.species, disease = %disease.name, "infected");
                return true;
            }
        }
        false
    }

    /// Advance an infected animal by one step: count the infected day, die
    /// at the fatal count, otherwise roll for a cure, otherwise expose
    /// adjacent same-species susceptible neighbors.
    ///
    /// The spread visits the first `max_infectable` entries of the
    /// adjacency list and applies the same infect-or-not decision as the
    /// initial infection to each qualifying neighbor, so every neighbor
    /// transitions at most once per call.
    pub fn advance_infection(
        &self,
        id: OrganismId,
        organisms: &mut HashMap<OrganismId, Organism>,
        field: &mut Field,
        species: &SpeciesTable,
        rng: &mut ChaCha8Rng,
    ) {
        let (species_id, location, max_infectable) = match organisms.get(&id) {
            Some(Organism::Animal(a))
                if a.is_alive() && a.infection == InfectionState::Infected =>
            {
                (a.species.clone(), a.location(), a.max_infectable as usize)
            }
            _ => return,
        };

        let cure_probability = species
            .animal(&species_id)
            .map(|profile| profile.cure_probability)
            .unwrap_or(0.0);

        {
            let Some(Organism::Animal(animal)) = organisms.get_mut(&id) else {
                return;
            };
            animal.infected_days += 1;
            if animal.infected_days >= self.fatal_days {
                animal.set_dead(DeathCause::Disease, field);
                return;
            }
            if rng.gen::<f64>() < cure_probability {
                animal.cure();
                debug!(animal = %id, species = %species_id, "cured");
                return;
            }
        }

        let Some(location) = location else { return };
        for neighbor in field
            .adjacent_locations(location)
            .into_iter()
            .take(max_infectable)
        {
            let Some(occupant) = field.occupant_at(neighbor) else {
                continue;
            };
            let Some(Organism::Animal(other)) = organisms.get_mut(&occupant) else {
                continue;
            };
            if other.is_alive() && other.species == species_id && other.can_be_infected() {
                self.try_initial_infection(other, rng);
            }
        }
    }
}
