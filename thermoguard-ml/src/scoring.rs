//! Anomaly scoring and contamination thresholds
//!
//! Scores follow the usual isolation forest normalization: 0.5 for a value as
//! hard to isolate as an average one, approaching 1.0 for values isolated in
//! very few splits.

use crate::{c_factor, MLError, MLResult};

/// Anomaly score result
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsolationScore {
    /// Normalized score in (0, 1], higher is more anomalous
    pub score: f64,
    /// Average path length across trees
    pub avg_path_length: f64,
    /// Number of trees used
    pub num_trees: usize,
}

impl IsolationScore {
    /// Create a new anomaly score
    pub fn new(score: f64, avg_path_length: f64, num_trees: usize) -> Self {
        Self {
            score,
            avg_path_length,
            num_trees,
        }
    }

    /// Check if score indicates an anomaly
    pub fn is_anomaly(&self, threshold: f64) -> bool {
        self.score > threshold
    }
}

/// Normalize an average path length into `2^(-E[h] / c(n))`
pub fn calculate_anomaly_score(avg_path_length: f64, num_samples: usize) -> f64 {
    let c = c_factor(num_samples);
    if c <= 0.0 {
        return 0.5;
    }

    2.0_f64.powf(-avg_path_length / c)
}

/// Quantile with linear interpolation between closest ranks
///
/// `q` is clamped to `[0, 1]`. Returns `None` for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q = if q.is_nan() { 0.5 } else { q.clamp(0.0, 1.0) };
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Score above which a value is labeled an outlier
///
/// The `1 - contamination` quantile of the training scores, so roughly a
/// `contamination` share of them end up above it.
pub fn contamination_threshold(scores: &[f64], contamination: f64) -> MLResult<f64> {
    if !(contamination > 0.0 && contamination <= 0.5) {
        return Err(MLError::InvalidContamination { contamination });
    }

    quantile(scores, 1.0 - contamination).ok_or(MLError::InsufficientData)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anomaly_score() {
        let score = IsolationScore::new(0.8, 5.0, 10);
        assert!(score.is_anomaly(0.7));
        assert!(!score.is_anomaly(0.8));
    }

    #[test]
    fn test_calculate_anomaly_score() {
        // Average path equal to c(n) scores exactly 0.5
        let c = c_factor(256);
        assert!((calculate_anomaly_score(c, 256) - 0.5).abs() < 1e-12);

        // Shorter paths score higher
        assert!(calculate_anomaly_score(1.0, 256) > calculate_anomaly_score(8.0, 256));

        // Degenerate sample size
        assert_eq!(calculate_anomaly_score(3.0, 1), 0.5);
    }

    #[test]
    fn test_quantile() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 0.5), Some(3.0));
        assert_eq!(quantile(&values, 1.0), Some(5.0));
        // position 0.9 * 4 = 3.6 -> 4 + 0.6 * (5 - 4)
        assert!((quantile(&values, 0.9).unwrap() - 4.6).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[7.0], 0.9), Some(7.0));
    }

    #[test]
    fn test_contamination_threshold() {
        let scores: Vec<f64> = (1..=100).map(|i| i as f64 / 100.0).collect();
        let threshold = contamination_threshold(&scores, 0.1).unwrap();

        let above = scores.iter().filter(|&&s| s > threshold).count();
        assert_eq!(above, 10);

        assert_eq!(
            contamination_threshold(&scores, 0.0),
            Err(MLError::InvalidContamination { contamination: 0.0 })
        );
        assert!(contamination_threshold(&scores, 0.6).is_err());
        assert!(contamination_threshold(&scores, f64::NAN).is_err());
        assert_eq!(contamination_threshold(&[], 0.1), Err(MLError::InsufficientData));
    }
}
