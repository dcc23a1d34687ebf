//! Command-line driver for the floe ecosystem simulator.
//!
//! Usage: `floe-sim [config.json] [steps]`. With no arguments the default
//! Arctic configuration runs for its configured step budget. The loop stops
//! early once the population is no longer viable.

use anyhow::{Context, Result};
use floe_core::SimConfig;
use floe_world::{Simulation, StatusSink, StepStatus};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pacing delay between steps, the pause that makes the console readable.
const STEP_DELAY: Duration = Duration::from_millis(50);

/// Prints a one-line summary per step and keeps the latest status for the
/// viability check.
#[derive(Default)]
struct ConsoleSink {
    latest: Option<StepStatus>,
}

impl StatusSink for ConsoleSink {
    fn publish(&mut self, status: &StepStatus) {
        let counts: Vec<String> = status
            .snapshot
            .counts()
            .iter()
            .map(|(species, count)| format!("{species}: {count}"))
            .collect();
        println!(
            "step {:>4}  {}  {:<5} {:>2}°  {}",
            status.step,
            if status.is_day { "day  " } else { "night" },
            status.weather,
            status.temperature,
            counts.join(", ")
        );
        self.latest = Some(status.clone());
    }
}

/// The run stays viable while more than one species remains.
fn is_viable(status: &StepStatus) -> bool {
    status.snapshot.species_present() > 1
}

fn load_config() -> Result<SimConfig> {
    let mut config = SimConfig::default();
    let mut args = std::env::args().skip(1);
    if let Some(path) = args.next() {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {path}"))?;
        config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {path}"))?;
    }
    if let Some(steps) = args.next() {
        config.num_steps = steps.parse().context("parsing step count")?;
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config()?;
    let num_steps = config.num_steps;
    let mut simulation = Simulation::new(config)?;
    let mut sink = ConsoleSink::default();
    simulation.publish_status(&mut sink);

    info!(num_steps, "starting simulation");
    for _ in 0..num_steps {
        simulation.step(&mut sink)?;
        if !sink.latest.as_ref().map(is_viable).unwrap_or(false) {
            info!(
                step = simulation.current_step(),
                "population no longer viable, stopping"
            );
            break;
        }
        std::thread::sleep(STEP_DELAY);
    }

    info!(step = simulation.current_step(), "simulation finished");
    Ok(())
}
