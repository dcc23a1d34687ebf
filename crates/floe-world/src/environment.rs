//! Day/night and weather state machine.

use floe_core::{Conditions, EnvironmentConfig, Weather};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Periodic environment clock: every `change_period` completed steps the
/// day/night flag flips and the weather is re-rolled. The two sub-states
/// share the cadence but are otherwise independent.
#[derive(Debug, Clone)]
pub struct EnvironmentClock {
    config: EnvironmentConfig,
    is_day: bool,
    weather: Weather,
    temperature: i32,
    counter: u32,
}

impl EnvironmentClock {
    pub fn new(config: EnvironmentConfig, rng: &mut ChaCha8Rng) -> Self {
        let (weather, temperature) = Self::roll(&config, rng);
        Self {
            config,
            is_day: true,
            weather,
            temperature,
            counter: 0,
        }
    }

    /// Advance one step. Returns true when the period elapsed and the
    /// day/night flag and weather were re-rolled.
    pub fn advance(&mut self, rng: &mut ChaCha8Rng) -> bool {
        self.counter += 1;
        if self.counter == self.config.change_period {
            self.is_day = !self.is_day;
            let (weather, temperature) = Self::roll(&self.config, rng);
            self.weather = weather;
            self.temperature = temperature;
            self.counter = 0;
            debug!(
                is_day = self.is_day,
                weather = %self.weather,
                temperature = self.temperature,
                "conditions changed"
            );
            true
        } else {
            false
        }
    }

    /// Draw a fresh weather state: temperature first, then the clear/not
    /// coin; non-clear weather is rain above the snow threshold, snow at or
    /// below it.
    fn roll(config: &EnvironmentConfig, rng: &mut ChaCha8Rng) -> (Weather, i32) {
        let temperature = rng.gen_range(0..config.max_temperature.max(1));
        let clear = rng.gen::<bool>();
        let weather = if clear {
            Weather::Clear
        } else if temperature > config.snow_threshold {
            Weather::Rain
        } else {
            Weather::Snow
        };
        (weather, temperature)
    }

    pub fn is_day(&self) -> bool {
        self.is_day
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    pub fn conditions(&self) -> Conditions {
        Conditions {
            is_day: self.is_day,
            weather: self.weather,
        }
    }
}
