//! Descriptive Statistics over Signal Columns
//!
//! ## Conventions
//!
//! - Standard deviations are **sample** deviations (divide by `n - 1`). A single
//!   value has no sample deviation, so the functions return `None` for it and
//!   callers decide what that means in their context.
//! - Slopes are least-squares fits against the plain position index
//!   `0..n-1`, never against timestamps. Uneven sampling intervals are not
//!   corrected for.
//! - Empty input yields `None`, not zero.
//!
//! ## Rolling Windows
//!
//! [`rolling_stats`] produces one entry per input value. Position `i` covers
//! the trailing window `values[i + 1 - window ..= i]`. Positions before the
//! first full window have no window of their own and carry the whole-series
//! mean and deviation instead:
//!
//! ```text
//! window = 3
//! values:  10  12  14  16  18
//! mean:    14  14  12  14  16     (first two filled with the series mean)
//! ```

use crate::reading::{ReadingSeries, Signal};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from `center`
fn squared_deviations(values: &[f64], center: f64) -> f64 {
    values.iter().map(|&v| (v - center).powi(2)).sum()
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let center = mean(values)?;
    Some((squared_deviations(values, center) / (values.len() - 1) as f64).sqrt())
}

/// Population standard deviation (n denominator)
pub fn population_std(values: &[f64]) -> Option<f64> {
    let center = mean(values)?;
    Some((squared_deviations(values, center) / values.len() as f64).sqrt())
}

/// Median, averaging the middle pair for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Least-squares slope of `values` against their index
///
/// Needs at least two values.
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values)?;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    Some(numerator / denominator)
}

/// Mean and deviation of one trailing window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollingStat {
    /// Window mean
    pub mean: f64,
    /// Window sample deviation
    pub std: f64,
}

/// Trailing-window mean and sample deviation for every position
///
/// A `window` of zero yields an empty result.
pub fn rolling_stats(values: &[f64], window: usize) -> Vec<RollingStat> {
    if window == 0 {
        return Vec::new();
    }
    let (fill_mean, fill_std) = match mean(values) {
        Some(m) => (m, sample_std(values).unwrap_or(0.0)),
        None => return Vec::new(),
    };

    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return RollingStat {
                    mean: fill_mean,
                    std: fill_std,
                };
            }
            let slice = &values[i + 1 - window..=i];
            RollingStat {
                mean: mean(slice).unwrap_or(fill_mean),
                std: sample_std(slice).unwrap_or(fill_std),
            }
        })
        .collect()
}

/// Summary of one signal column
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalSummary {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Sample deviation, zero for a single reading
    pub std: f64,
}

impl SignalSummary {
    /// Summarize a column, `None` when empty
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let median = median(values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            min,
            max,
            mean,
            median,
            std: sample_std(values).unwrap_or(0.0),
        })
    }
}

/// Summary of both signals over a series
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesSummary {
    /// Number of readings summarized
    pub count: usize,
    /// Temperature column
    pub temperature: SignalSummary,
    /// Humidity column
    pub humidity: SignalSummary,
}

impl SeriesSummary {
    /// Summarize a series, `None` when it is empty
    pub fn compute(series: &ReadingSeries) -> Option<Self> {
        Some(Self {
            count: series.len(),
            temperature: SignalSummary::compute(&series.values(Signal::Temperature))?,
            humidity: SignalSummary::compute(&series.values(Signal::Humidity))?,
        })
    }

    /// Summary of one signal
    pub fn signal(&self, signal: Signal) -> &SignalSummary {
        match signal {
            Signal::Temperature => &self.temperature,
            Signal::Humidity => &self.humidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_and_deviation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&values).unwrap(), 5.0));
        assert!(close(population_std(&values).unwrap(), 2.0));
        assert!(close(sample_std(&values).unwrap(), (32.0f64 / 7.0).sqrt()));
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[]), None);
        assert_eq!(sample_std(&[3.0]), None);
        assert_eq!(population_std(&[3.0]), Some(0.0));
        assert_eq!(sample_std(&[3.0, 3.0, 3.0]), Some(0.0));
        assert_eq!(linear_slope(&[1.0]), None);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn slope_of_a_line() {
        let values: Vec<f64> = (0..30).map(|i| 20.0 + 0.2 * i as f64).collect();
        assert!(close(linear_slope(&values).unwrap(), 0.2));

        let falling: Vec<f64> = (0..10).map(|i| 5.0 - 1.5 * i as f64).collect();
        assert!(close(linear_slope(&falling).unwrap(), -1.5));

        assert!(close(linear_slope(&[7.0, 7.0, 7.0]).unwrap(), 0.0));
    }

    #[test]
    fn rolling_window_fills_leading_positions() {
        let values = [10.0, 12.0, 14.0, 16.0, 18.0];
        let rolling = rolling_stats(&values, 3);

        assert_eq!(rolling.len(), values.len());
        // Series mean fills the first window - 1 slots
        assert!(close(rolling[0].mean, 14.0));
        assert!(close(rolling[1].mean, 14.0));
        assert!(close(rolling[1].std, sample_std(&values).unwrap()));
        // Trailing windows afterwards
        assert!(close(rolling[2].mean, 12.0));
        assert!(close(rolling[3].mean, 14.0));
        assert!(close(rolling[4].mean, 16.0));
        assert!(close(rolling[4].std, 2.0));
    }

    #[test]
    fn rolling_window_of_one_uses_series_deviation() {
        let values = [1.0, 3.0];
        let rolling = rolling_stats(&values, 1);
        assert!(close(rolling[0].mean, 1.0));
        assert!(close(rolling[1].mean, 3.0));
        assert!(close(rolling[1].std, sample_std(&values).unwrap()));
    }

    #[test]
    fn rolling_window_edge_cases() {
        assert!(rolling_stats(&[], 3).is_empty());
        assert!(rolling_stats(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn series_summary() {
        let series = ReadingSeries::new(vec![
            Reading::new(0, 20.0, 40.0),
            Reading::new(1, 22.0, 60.0),
            Reading::new(2, 24.0, 50.0),
        ])
        .unwrap();

        let summary = SeriesSummary::compute(&series).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.temperature.min, 20.0);
        assert_eq!(summary.temperature.max, 24.0);
        assert!(close(summary.temperature.mean, 22.0));
        assert_eq!(summary.humidity.median, 50.0);
        assert!(close(summary.signal(Signal::Humidity).std, 10.0));

        assert_eq!(SeriesSummary::compute(&ReadingSeries::default()), None);
    }
}
