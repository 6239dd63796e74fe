//! Shared series builders for integration tests
//!
//! Every builder is deterministic: the "noise" is a fixed pseudo-random
//! sequence so assertions on counts and classifications stay stable.

#![allow(dead_code)]

use thermoguard_core::{Reading, ReadingSeries, Timestamp};

/// Five-minute sampling, the collector's historical backfill interval
pub const INTERVAL_MS: Timestamp = 5 * 60 * 1000;

/// Deterministic noise in [-amplitude, amplitude]
pub struct Noise {
    seed: u32,
}

impl Noise {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next(&mut self, amplitude: f64) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        let uniform = self.seed as f64 / u32::MAX as f64;
        (uniform - 0.5) * 2.0 * amplitude
    }
}

/// Series from two equally long columns
pub fn series(temperatures: &[f64], humidities: &[f64]) -> ReadingSeries {
    assert_eq!(temperatures.len(), humidities.len());
    let readings = temperatures
        .iter()
        .zip(humidities)
        .enumerate()
        .map(|(i, (&t, &h))| Reading::new(i as Timestamp * INTERVAL_MS, t, h))
        .collect();
    ReadingSeries::new(readings).expect("builder produces ordered finite readings")
}

/// Straight line with optional noise
pub fn line(len: usize, start: f64, slope: f64, noise: Option<(&mut Noise, f64)>) -> Vec<f64> {
    let mut values: Vec<f64> = (0..len).map(|i| start + slope * i as f64).collect();
    if let Some((noise, amplitude)) = noise {
        for v in &mut values {
            *v += noise.next(amplitude);
        }
    }
    values
}

/// Flat noisy signal around `base`
pub fn noisy(len: usize, base: f64, amplitude: f64, seed: u32) -> Vec<f64> {
    let mut noise = Noise::new(seed);
    (0..len).map(|_| base + noise.next(amplitude)).collect()
}
