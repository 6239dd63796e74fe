//! Trend and Stability Classification
//!
//! ## Overview
//!
//! [`PatternAnalyzer`] answers two questions about each signal of a series:
//!
//! 1. **Trend**: is the signal drifting up, drifting down, or flat?
//! 2. **Stability**: how much does it fluctuate around its mean?
//!
//! ## Decision Rules
//!
//! Both decisions use whole-series statistics. The rolling-window statistics
//! are computed alongside for reporting ([`PatternAnalyzer::analyze_detailed`])
//! but never gate a classification.
//!
//! ### Trend
//! Only classified when the series is strictly longer than the window;
//! otherwise it stays `Stable`. The slope is a least-squares fit against the
//! reading index (not elapsed time):
//!
//! | Signal      | Rising        | Falling        |
//! |-------------|---------------|----------------|
//! | Temperature | slope > 0.05  | slope < -0.05  |
//! | Humidity    | slope > 0.1   | slope < -0.1   |
//!
//! ### Stability
//! From the whole-series sample deviation:
//!
//! | Signal      | Low       | Medium    | High    |
//! |-------------|-----------|-----------|---------|
//! | Temperature | std > 2.0 | std > 1.0 | else    |
//! | Humidity    | std > 5.0 | std > 2.5 | else    |
//!
//! ## Insufficient Data
//!
//! A series shorter than the window yields `InsufficientData` for all four
//! classifications and no statistics. That is a normal result, not an error.

use crate::{
    constants::{stability, trend, DEFAULT_WINDOW_SIZE},
    errors::{check_window_size, AnalysisResult},
    reading::{ReadingSeries, Signal},
    stats::{linear_slope, mean, rolling_stats, sample_std, RollingStat},
};

/// Direction of a signal over the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trend {
    /// Slope above the rising threshold
    Rising,
    /// Slope below the falling threshold
    Falling,
    /// Neither, or the series is not longer than the window
    Stable,
    /// Series shorter than the window
    InsufficientData,
}

impl Trend {
    fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            Trend::Rising
        } else if slope < -threshold {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

impl core::fmt::Display for Trend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Trend::Rising => "Rising",
            Trend::Falling => "Falling",
            Trend::Stable => "Stable",
            Trend::InsufficientData => "Insufficient data",
        })
    }
}

/// How tightly a signal holds its mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stability {
    /// Small deviation
    High,
    /// Moderate deviation
    Medium,
    /// Large deviation
    Low,
    /// Series shorter than the window
    InsufficientData,
}

impl Stability {
    fn from_std(std: f64, low: f64, medium: f64) -> Self {
        if std > low {
            Stability::Low
        } else if std > medium {
            Stability::Medium
        } else {
            Stability::High
        }
    }
}

impl core::fmt::Display for Stability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Stability::High => "High",
            Stability::Medium => "Medium",
            Stability::Low => "Low",
            Stability::InsufficientData => "Insufficient data",
        })
    }
}

/// Whole-series mean and sample deviation of one signal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalStats {
    /// Mean
    pub mean: f64,
    /// Sample deviation, zero for a single reading
    pub std: f64,
}

/// Classification of both signals
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternResult {
    /// Temperature direction
    pub temperature_trend: Trend,
    /// Humidity direction
    pub humidity_trend: Trend,
    /// Temperature fluctuation
    pub temperature_stability: Stability,
    /// Humidity fluctuation
    pub humidity_stability: Stability,
    /// Temperature mean/std, absent with insufficient data
    pub temperature_stats: Option<SignalStats>,
    /// Humidity mean/std, absent with insufficient data
    pub humidity_stats: Option<SignalStats>,
}

impl PatternResult {
    /// Result for a series shorter than the window
    pub fn insufficient_data() -> Self {
        Self {
            temperature_trend: Trend::InsufficientData,
            humidity_trend: Trend::InsufficientData,
            temperature_stability: Stability::InsufficientData,
            humidity_stability: Stability::InsufficientData,
            temperature_stats: None,
            humidity_stats: None,
        }
    }

    /// True when the series was too short to classify
    pub fn is_insufficient(&self) -> bool {
        self.temperature_stats.is_none()
    }

    /// Trend of one signal
    pub fn trend(&self, signal: Signal) -> Trend {
        match signal {
            Signal::Temperature => self.temperature_trend,
            Signal::Humidity => self.humidity_trend,
        }
    }

    /// Stability of one signal
    pub fn stability(&self, signal: Signal) -> Stability {
        match signal {
            Signal::Temperature => self.temperature_stability,
            Signal::Humidity => self.humidity_stability,
        }
    }

    /// Statistics of one signal
    pub fn stats(&self, signal: Signal) -> Option<SignalStats> {
        match signal {
            Signal::Temperature => self.temperature_stats,
            Signal::Humidity => self.humidity_stats,
        }
    }
}

impl core::fmt::Display for PatternResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, signal) in Signal::ALL.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}: trend {}, stability {}",
                signal,
                self.trend(*signal),
                self.stability(*signal)
            )?;
            if let Some(stats) = self.stats(*signal) {
                write!(f, " (mean {:.2}, std {:.2})", stats.mean, stats.std)?;
            }
        }
        Ok(())
    }
}

/// Classification plus the rolling statistics behind the charts
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternReport {
    /// Trend/stability verdicts
    pub result: PatternResult,
    /// Rolling temperature statistics, one per reading
    pub temperature_rolling: Vec<RollingStat>,
    /// Rolling humidity statistics, one per reading
    pub humidity_rolling: Vec<RollingStat>,
}

/// Trend/stability analyzer with a fixed rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternAnalyzer {
    window_size: usize,
}

impl Default for PatternAnalyzer {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl PatternAnalyzer {
    /// Create an analyzer, rejecting an empty window
    pub fn new(window_size: usize) -> AnalysisResult<Self> {
        check_window_size(window_size)?;
        Ok(Self { window_size })
    }

    /// Rolling window length in readings
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Classify trend and stability of both signals
    pub fn analyze(&self, series: &ReadingSeries) -> AnalysisResult<PatternResult> {
        check_window_size(self.window_size)?;

        if series.is_empty() || series.len() < self.window_size {
            return Ok(PatternResult::insufficient_data());
        }

        let temperatures = series.values(Signal::Temperature);
        let humidities = series.values(Signal::Humidity);
        let trending = series.len() > self.window_size;

        let (temperature_trend, temperature_stats) =
            classify(&temperatures, trending, trend::TEMPERATURE_SLOPE);
        let (humidity_trend, humidity_stats) =
            classify(&humidities, trending, trend::HUMIDITY_SLOPE);

        Ok(PatternResult {
            temperature_trend,
            humidity_trend,
            temperature_stability: Stability::from_std(
                temperature_stats.std,
                stability::TEMPERATURE_LOW,
                stability::TEMPERATURE_MEDIUM,
            ),
            humidity_stability: Stability::from_std(
                humidity_stats.std,
                stability::HUMIDITY_LOW,
                stability::HUMIDITY_MEDIUM,
            ),
            temperature_stats: Some(temperature_stats),
            humidity_stats: Some(humidity_stats),
        })
    }

    /// Classify and also report rolling statistics
    ///
    /// The rolling vectors are empty when the series is shorter than the window.
    pub fn analyze_detailed(&self, series: &ReadingSeries) -> AnalysisResult<PatternReport> {
        let result = self.analyze(series)?;

        let (temperature_rolling, humidity_rolling) = if result.is_insufficient() {
            (Vec::new(), Vec::new())
        } else {
            (
                rolling_stats(&series.values(Signal::Temperature), self.window_size),
                rolling_stats(&series.values(Signal::Humidity), self.window_size),
            )
        };

        Ok(PatternReport {
            result,
            temperature_rolling,
            humidity_rolling,
        })
    }
}

/// Trend and whole-series stats of one non-empty column
fn classify(values: &[f64], trending: bool, slope_threshold: f64) -> (Trend, SignalStats) {
    let stats = SignalStats {
        mean: mean(values).unwrap_or(0.0),
        std: sample_std(values).unwrap_or(0.0),
    };

    let trend = match linear_slope(values) {
        Some(slope) if trending => Trend::from_slope(slope, slope_threshold),
        _ => Trend::Stable,
    };

    (trend, stats)
}
