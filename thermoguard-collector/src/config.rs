//! Monitor configuration
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! {
//!     "sensitivity": 2.5,
//!     "timeframe": "last_6_hours",
//!     "thresholds": { "temperature_max": 28.0 }
//! }
//! ```

use crate::monitor::MonitorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thermoguard_core::{
    constants::{DEFAULT_SENSITIVITY, DEFAULT_WINDOW_SIZE},
    errors::{check_sensitivity, check_window_size},
    time::{lookback_start, MS_PER_HOUR},
    AlertThresholds, AnalysisError, Timestamp,
};
use thermoguard_ml::ForestConfig;

/// How far back the analysed window reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// One hour
    LastHour,
    /// Six hours
    #[serde(rename = "last_6_hours")]
    Last6Hours,
    /// Twelve hours
    #[serde(rename = "last_12_hours")]
    Last12Hours,
    /// One day
    #[default]
    LastDay,
    /// Seven days
    LastWeek,
    /// Thirty days
    LastMonth,
    /// Everything stored
    All,
}

impl Timeframe {
    /// Every timeframe, shortest first
    pub const ALL: [Timeframe; 7] = [
        Timeframe::LastHour,
        Timeframe::Last6Hours,
        Timeframe::Last12Hours,
        Timeframe::LastDay,
        Timeframe::LastWeek,
        Timeframe::LastMonth,
        Timeframe::All,
    ];

    /// Look-back in hours, 0 for all history
    pub fn hours(&self) -> u64 {
        match self {
            Timeframe::LastHour => 1,
            Timeframe::Last6Hours => 6,
            Timeframe::Last12Hours => 12,
            Timeframe::LastDay => 24,
            Timeframe::LastWeek => 24 * 7,
            Timeframe::LastMonth => 24 * 30,
            Timeframe::All => 0,
        }
    }

    /// Earliest timestamp inside the window ending at `now`
    pub fn since(&self, now: Timestamp) -> Option<Timestamp> {
        lookback_start(now, self.hours())
    }
}

/// Settings of a [`Monitor`](crate::Monitor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Anomaly sensitivity, see `AnomalyDetector::detect`
    pub sensitivity: f64,
    /// Rolling window of the pattern analyzer
    pub window_size: usize,
    /// Window of history analysed each tick
    pub timeframe: Timeframe,
    /// Recent readings included in each snapshot
    pub latest_count: usize,
    /// Pause between ticks in [`Monitor::run`](crate::Monitor::run)
    pub poll_interval_ms: u64,
    /// Drop readings older than this many days, keep everything when unset
    pub retention_days: Option<u64>,
    /// Operating bands
    pub thresholds: AlertThresholds,
    /// Forest used for large windows
    pub forest: ForestConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            window_size: DEFAULT_WINDOW_SIZE,
            timeframe: Timeframe::LastDay,
            latest_count: 30,
            poll_interval_ms: 3_000,
            retention_days: None,
            thresholds: AlertThresholds::default(),
            forest: ForestConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Parse and validate JSON
    pub fn from_json_str(json: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, MonitorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the analysis would refuse
    pub fn validate(&self) -> Result<(), MonitorError> {
        check_sensitivity(self.sensitivity)?;
        check_window_size(self.window_size)?;
        self.forest.validate().map_err(AnalysisError::from)?;
        Ok(())
    }

    /// Retention cutoff for a tick at `now`
    pub fn retention_cutoff(&self, now: Timestamp) -> Option<Timestamp> {
        self.retention_days
            .map(|days| now.saturating_sub(days.saturating_mul(24 * MS_PER_HOUR)))
    }
}
