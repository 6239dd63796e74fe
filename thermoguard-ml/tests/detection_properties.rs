//! Detection properties across both methods
//!
//! Series are built from small deterministic generators so every case can be
//! reproduced from its parameters alone.

use proptest::prelude::*;
use thermoguard_core::{AnalysisError, Reading, ReadingSeries, Signal};
use thermoguard_ml::{
    contamination_for, AnomalyDetector, AnomalyScore, DetectionMethod, ForestConfig,
    IsolationModel,
};

const INTERVAL_MS: u64 = 5 * 60_000;

fn series_from(temps: &[f64], humid: &[f64]) -> ReadingSeries {
    let readings = temps
        .iter()
        .zip(humid)
        .enumerate()
        .map(|(i, (&t, &h))| Reading::new(i as u64 * INTERVAL_MS, t, h))
        .collect();
    ReadingSeries::new(readings).unwrap()
}

/// Bounded pseudo-random wobble around `base`
fn wobble(len: usize, base: f64, amplitude: f64, seed: u64) -> Vec<f64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            base + (unit * 2.0 - 1.0) * amplitude
        })
        .collect()
}

#[test]
fn temperature_outlier_leaves_humidity_clean() {
    for len in [30usize, 150] {
        let mut temps = wobble(len, 22.0, 0.3, 1);
        temps[len / 2] = 34.0;
        let humid = vec![52.0; len];

        let result = AnomalyDetector::new().detect(&series_from(&temps, &humid), 3.0).unwrap();

        assert!(result.temperature.iter().any(|a| a.index == len / 2), "len {}", len);
        assert!(result.humidity.is_empty(), "len {}", len);
    }
}

#[test]
fn a_reading_may_be_flagged_in_both_signals() {
    let mut temps = wobble(25, 22.0, 0.2, 3);
    let mut humid = wobble(25, 50.0, 0.5, 4);
    temps[10] = 30.0;
    humid[10] = 80.0;

    let result = AnomalyDetector::new().detect(&series_from(&temps, &humid), 3.0).unwrap();

    assert_eq!(result.temperature.len(), 1);
    assert_eq!(result.humidity.len(), 1);
    assert_eq!(result.temperature[0].reading, result.humidity[0].reading);
    assert_eq!(result.signal(Signal::Humidity)[0].index, 10);
}

#[test]
fn method_switches_at_fifty_readings() {
    let detector = AnomalyDetector::new();

    let at = |len: usize| {
        let s = series_from(&wobble(len, 21.0, 0.5, 9), &wobble(len, 45.0, 1.0, 10));
        detector.detect(&s, 4.0).unwrap().method
    };

    assert_eq!(at(9), None);
    assert_eq!(at(10), Some(DetectionMethod::ZScore));
    assert_eq!(at(49), Some(DetectionMethod::ZScore));
    assert_eq!(at(50), Some(DetectionMethod::IsolationForest { contamination: 0.1 }));
}

#[test]
fn forest_flag_count_bounded_by_contamination() {
    let len = 500;
    let s = series_from(&wobble(len, 22.0, 1.0, 21), &wobble(len, 55.0, 4.0, 22));
    let detector = AnomalyDetector::new();

    for sensitivity in [1.0, 20.0, 100.0] {
        let result = detector.detect(&s, sensitivity).unwrap();
        let limit = (contamination_for(sensitivity) * len as f64).ceil() as usize + 1;

        assert!(result.temperature.len() <= limit);
        assert!(result.humidity.len() <= limit);
        assert!(result
            .temperature
            .iter()
            .all(|a| matches!(a.score, AnomalyScore::Outlier { .. })));
    }
}

#[test]
fn seed_controls_forest_labels() {
    let len = 300;
    let s = series_from(&wobble(len, 22.0, 1.0, 5), &wobble(len, 55.0, 3.0, 6));

    let a = AnomalyDetector::new().detect(&s, 3.0).unwrap();
    let b = AnomalyDetector::with_model(IsolationModel::new(ForestConfig {
        seed: 42,
        ..ForestConfig::default()
    }))
    .detect(&s, 3.0)
    .unwrap();

    assert_eq!(a, b);
}

#[test]
fn invalid_sensitivity_is_a_hard_failure() {
    let s = series_from(&[20.0; 3], &[50.0; 3]);
    assert_eq!(
        AnomalyDetector::new().detect(&s, -2.0),
        Err(AnalysisError::InvalidSensitivity { sensitivity: -2.0 })
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_short_series_never_flag(
        len in 0usize..10,
        seed in any::<u64>(),
        sensitivity in 0.01f64..10.0,
    ) {
        let s = series_from(&wobble(len, 20.0, 15.0, seed), &wobble(len, 50.0, 40.0, seed ^ 1));
        let result = AnomalyDetector::new().detect(&s, sensitivity).unwrap();
        prop_assert!(result.is_empty());
    }

    #[test]
    fn prop_contamination_bounds(sensitivity in 1e-6f64..1e6) {
        let c = contamination_for(sensitivity);
        prop_assert!((0.01..=0.1).contains(&c));
    }

    #[test]
    fn prop_zscore_count_monotonic(
        len in 10usize..50,
        seed in any::<u64>(),
        low in 0.1f64..3.0,
        step in 0.0f64..3.0,
    ) {
        let s = series_from(&wobble(len, 22.0, 2.0, seed), &wobble(len, 55.0, 8.0, seed ^ 7));
        let detector = AnomalyDetector::new();

        let loose = detector.detect(&s, low).unwrap();
        let strict = detector.detect(&s, low + step).unwrap();

        prop_assert!(strict.temperature.len() <= loose.temperature.len());
        prop_assert!(strict.humidity.len() <= loose.humidity.len());
    }

    #[test]
    fn prop_constant_signal_has_no_zscore_anomalies(
        len in 10usize..50,
        value in -40.0f64..60.0,
        seed in any::<u64>(),
    ) {
        let s = series_from(&vec![value; len], &wobble(len, 55.0, 5.0, seed));
        let result = AnomalyDetector::new().detect(&s, 1.0).unwrap();
        prop_assert!(result.temperature.is_empty());
    }
}
