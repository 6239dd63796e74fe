//! Analysis thresholds
//!
//! Humidity is naturally noisier than air temperature, so every humidity
//! threshold is wider than its temperature counterpart.

/// Fewer readings than this and anomaly detection returns nothing
pub const MIN_DETECTION_READINGS: usize = 10;

/// Series shorter than this use z-scores, longer ones the isolation forest
pub const ZSCORE_MAX_READINGS: usize = 50;

/// Lower bound on the fraction of readings an isolation model may flag
pub const MIN_CONTAMINATION: f64 = 0.01;

/// Upper bound on the fraction of readings an isolation model may flag
pub const MAX_CONTAMINATION: f64 = 0.1;

/// Default rolling window, in readings
pub const DEFAULT_WINDOW_SIZE: usize = 24;

/// Default sensitivity (z-score threshold)
pub const DEFAULT_SENSITIVITY: f64 = 3.0;

/// Trend slope thresholds, in signal units per reading
pub mod trend {
    /// |slope| above this is a temperature trend (°C per reading)
    pub const TEMPERATURE_SLOPE: f64 = 0.05;

    /// |slope| above this is a humidity trend (% per reading)
    pub const HUMIDITY_SLOPE: f64 = 0.1;
}

/// Stability thresholds on whole-series sample deviation
pub mod stability {
    /// Temperature deviation above this is Low stability (°C)
    pub const TEMPERATURE_LOW: f64 = 2.0;

    /// Temperature deviation above this is Medium stability (°C)
    pub const TEMPERATURE_MEDIUM: f64 = 1.0;

    /// Humidity deviation above this is Low stability (%)
    pub const HUMIDITY_LOW: f64 = 5.0;

    /// Humidity deviation above this is Medium stability (%)
    pub const HUMIDITY_MEDIUM: f64 = 2.5;
}

/// Default operating ranges for alerts
pub mod alerts {
    /// Lowest acceptable temperature (°C)
    pub const TEMPERATURE_MIN_C: f64 = 15.0;

    /// Highest acceptable temperature (°C)
    pub const TEMPERATURE_MAX_C: f64 = 30.0;

    /// Lowest acceptable relative humidity (%)
    pub const HUMIDITY_MIN_PCT: f64 = 30.0;

    /// Highest acceptable relative humidity (%)
    pub const HUMIDITY_MAX_PCT: f64 = 70.0;
}
