//! Mock sensor generator
//!
//! Synthetic readings for demos and tests, built as a random walk:
//!
//! ```text
//! seasonal = sin(t / period) * amplitude           day/night cycle
//! temp    += trend_temp + seasonal * 0.1
//! humid   += trend_humid - seasonal * 0.2
//! value    = clamp(state + noise)                  sensor fluctuation
//! value   += occasional spike                      injected anomaly
//! ```
//!
//! Trends are re-drawn now and then to mimic slow weather changes. Spiked
//! values feed back into the walk, so a spike shifts the following readings
//! too. All state lives in the generator itself; two generators never
//! influence each other.

use crate::{source::RawSample, CollectError, ReadingSource};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thermoguard_core::{
    time::{MS_PER_HOUR, MS_PER_MINUTE},
    Reading, Timestamp,
};

/// Largest spread whose `[-spread, spread]` range rand can sample
const MAX_SPREAD: f64 = f64::MAX / 8.0;

/// Tunables of the random walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Starting temperature (°C)
    pub initial_temperature: f64,
    /// Starting humidity (%)
    pub initial_humidity: f64,
    /// Allowed temperature band before spikes
    pub temperature_range: (f64, f64),
    /// Allowed humidity band before spikes
    pub humidity_range: (f64, f64),
    /// Chance per step of re-drawing each trend
    pub trend_change_probability: f64,
    /// Temperature trend drawn from `±temperature_trend`
    pub temperature_trend: f64,
    /// Humidity trend drawn from `±humidity_trend`
    pub humidity_trend: f64,
    /// Temperature noise drawn from `±temperature_noise`
    pub temperature_noise: f64,
    /// Humidity noise drawn from `±humidity_noise`
    pub humidity_noise: f64,
    /// Steps per radian of the seasonal cycle
    pub seasonal_period: f64,
    /// Seasonal swing
    pub seasonal_amplitude: f64,
    /// Chance per step of a spike in each signal
    pub spike_probability: f64,
    /// Temperature spike magnitudes, applied with a random sign
    pub temperature_spikes: [f64; 3],
    /// Humidity spike magnitudes, applied with a random sign
    pub humidity_spikes: [f64; 3],
    /// Fixed seed, or fresh entropy when unset
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 23.0,
            initial_humidity: 50.0,
            temperature_range: (15.0, 35.0),
            humidity_range: (30.0, 90.0),
            trend_change_probability: 0.02,
            temperature_trend: 0.1,
            humidity_trend: 0.2,
            temperature_noise: 0.3,
            humidity_noise: 0.5,
            seasonal_period: 100.0,
            seasonal_amplitude: 3.0,
            spike_probability: 0.01,
            temperature_spikes: [3.0, 4.0, 5.0],
            humidity_spikes: [6.0, 8.0, 10.0],
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Default walk with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject values the walk cannot use
    pub fn validate(&self) -> Result<(), CollectError> {
        let probabilities = [self.trend_change_probability, self.spike_probability];
        if !probabilities.iter().all(|p| (0.0..=1.0).contains(p)) {
            return Err(CollectError::ConfigError(
                "probabilities must be within [0, 1]".to_string(),
            ));
        }

        let spreads = [
            self.temperature_trend,
            self.humidity_trend,
            self.temperature_noise,
            self.humidity_noise,
        ];
        if !spreads.iter().all(|&s| (0.0..=MAX_SPREAD).contains(&s)) {
            return Err(CollectError::ConfigError(
                "trend and noise spreads must be non-negative and samplable".to_string(),
            ));
        }

        let magnitudes = [
            self.initial_temperature,
            self.initial_humidity,
            self.seasonal_amplitude,
        ];
        let spikes = self.temperature_spikes.iter().chain(&self.humidity_spikes);
        if !magnitudes.iter().chain(spikes).all(|v| v.is_finite()) {
            return Err(CollectError::ConfigError(
                "initial values, seasonal amplitude and spikes must be finite".to_string(),
            ));
        }

        for (name, (lo, hi)) in [
            ("temperature_range", self.temperature_range),
            ("humidity_range", self.humidity_range),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(CollectError::ConfigError(format!(
                    "{} must be an ordered finite band",
                    name
                )));
            }
        }

        if !(self.seasonal_period > 0.0) {
            return Err(CollectError::ConfigError(
                "seasonal_period must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Walk state carried between steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorState {
    /// Last temperature, spikes included
    pub last_temperature: f64,
    /// Last humidity, spikes included
    pub last_humidity: f64,
    /// Steps taken
    pub time_offset: u64,
    /// Current temperature drift per step
    pub trend_temperature: f64,
    /// Current humidity drift per step
    pub trend_humidity: f64,
    /// Seasonal offset of the last step
    pub seasonal_offset: f64,
}

impl GeneratorState {
    fn initial(config: &GeneratorConfig) -> Self {
        Self {
            last_temperature: config.initial_temperature,
            last_humidity: config.initial_humidity,
            time_offset: 0,
            trend_temperature: 0.0,
            trend_humidity: 0.0,
            seasonal_offset: 0.0,
        }
    }
}

/// Stateful synthetic [`ReadingSource`]
#[derive(Debug, Clone)]
pub struct MockGenerator {
    config: GeneratorConfig,
    state: GeneratorState,
    rng: StdRng,
}

impl MockGenerator {
    /// Create a generator, validating the configuration
    pub fn new(config: GeneratorConfig) -> Result<Self, CollectError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            state: GeneratorState::initial(&config),
            config,
            rng,
        })
    }

    /// Default walk with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        let config = GeneratorConfig::seeded(seed);
        Self {
            state: GeneratorState::initial(&config),
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Current walk state
    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// Return the walk to its starting point
    ///
    /// The random sequence continues; only the walk state is reset.
    pub fn reset(&mut self) {
        self.state = GeneratorState::initial(&self.config);
    }

    /// Advance one step, values rounded to one decimal
    pub fn next_sample(&mut self) -> RawSample {
        let cfg = &self.config;
        let state = &mut self.state;

        state.time_offset += 1;
        state.seasonal_offset =
            (state.time_offset as f64 / cfg.seasonal_period).sin() * cfg.seasonal_amplitude;

        if self.rng.gen::<f64>() < cfg.trend_change_probability {
            state.trend_temperature = symmetric(&mut self.rng, cfg.temperature_trend);
        }
        if self.rng.gen::<f64>() < cfg.trend_change_probability {
            state.trend_humidity = symmetric(&mut self.rng, cfg.humidity_trend);
        }

        state.last_temperature += state.trend_temperature;
        state.last_humidity += state.trend_humidity;

        state.last_temperature += state.seasonal_offset * 0.1;
        state.last_humidity -= state.seasonal_offset * 0.2;

        let temperature_noise = symmetric(&mut self.rng, cfg.temperature_noise);
        let humidity_noise = symmetric(&mut self.rng, cfg.humidity_noise);

        let (t_lo, t_hi) = cfg.temperature_range;
        let (h_lo, h_hi) = cfg.humidity_range;
        let mut temperature = (state.last_temperature + temperature_noise).clamp(t_lo, t_hi);
        let mut humidity = (state.last_humidity + humidity_noise).clamp(h_lo, h_hi);

        if self.rng.gen::<f64>() < cfg.spike_probability {
            temperature += spike(&mut self.rng, &cfg.temperature_spikes);
        }
        if self.rng.gen::<f64>() < cfg.spike_probability {
            humidity += spike(&mut self.rng, &cfg.humidity_spikes);
        }

        state.last_temperature = temperature;
        state.last_humidity = humidity;

        RawSample::new(round1(temperature), round1(humidity))
    }

    /// Backfill `hours` of readings every `interval_minutes`, ending at `end`
    ///
    /// The walk is reset first. Readings start `hours` before `end` and the
    /// last one falls one interval short of it. A zero interval yields nothing.
    pub fn historical(&mut self, hours: u64, interval_minutes: u64, end: Timestamp) -> Vec<Reading> {
        self.reset();

        if interval_minutes == 0 {
            return Vec::new();
        }

        let count = hours.saturating_mul(60) / interval_minutes;
        let step = interval_minutes.saturating_mul(MS_PER_MINUTE);
        let start = end.saturating_sub(hours.saturating_mul(MS_PER_HOUR));

        (0..count)
            .map(|i| {
                let timestamp = start.saturating_add(i.saturating_mul(step));
                self.next_sample().at(timestamp)
            })
            .collect()
    }
}

impl ReadingSource for MockGenerator {
    fn poll(&mut self) -> Result<Option<RawSample>, CollectError> {
        Ok(Some(self.next_sample()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Uniform draw from `[-spread, spread]`
fn symmetric(rng: &mut StdRng, spread: f64) -> f64 {
    rng.gen_range(-spread..=spread)
}

/// One of `magnitudes` with a random sign
fn spike(rng: &mut StdRng, magnitudes: &[f64; 3]) -> f64 {
    let magnitude = magnitudes[rng.gen_range(0..magnitudes.len())];
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // Too large to scale by ten
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}
