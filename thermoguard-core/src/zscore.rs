//! Z-score outlier detection
//!
//! Used for series too short to train an isolation forest on. Each value is
//! scored by how many sample deviations it sits from the column mean:
//!
//! ```text
//! z = |value - mean| / std
//! ```
//!
//! `std` is the sample deviation (`n - 1` denominator), the same estimator the
//! pattern analyzer reports. Tools that divide by `n` instead (such as
//! `scipy.stats.zscore`) give slightly larger scores, so a value right at the
//! cutoff can be flagged there and not here.
//!
//! A value is an outlier only when `z` is strictly greater than the threshold.
//! A constant column has `std == 0`; every z-score is then undefined and no
//! value is reported.

use crate::stats::{mean, sample_std};

/// A value whose z-score exceeded the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreHit {
    /// Position in the input column
    pub index: usize,
    /// Absolute z-score
    pub zscore: f64,
}

/// Absolute z-score of every value
///
/// `None` when the column has fewer than two values or zero deviation.
pub fn zscores(values: &[f64]) -> Option<Vec<f64>> {
    // Checked directly: a rounded mean would leave a tiny nonzero deviation
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return None;
    }

    let center = mean(values)?;
    let std = sample_std(values)?;
    if std == 0.0 {
        return None;
    }

    Some(values.iter().map(|&v| (v - center).abs() / std).collect())
}

/// Values whose absolute z-score is strictly above `threshold`
pub fn outliers(values: &[f64], threshold: f64) -> Vec<ZScoreHit> {
    let Some(scores) = zscores(values) else {
        return Vec::new();
    };

    scores
        .into_iter()
        .enumerate()
        .filter(|&(_, zscore)| zscore > threshold)
        .map(|(index, zscore)| ZScoreHit { index, zscore })
        .collect()
}
