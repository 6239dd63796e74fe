//! Operating-range alerts
//!
//! Independent of the statistical detectors: a reading either sits inside the
//! configured band for each signal or it does not. Bounds are inclusive, so a
//! reading exactly on a limit raises nothing.
//!
//! ```rust
//! use thermoguard_core::{AlertKind, AlertThresholds, Reading};
//!
//! let thresholds = AlertThresholds::default(); // 15-30 °C, 30-70 %RH
//! let alerts = thresholds.check(&Reading::new(0, 31.5, 50.0));
//!
//! assert_eq!(alerts.len(), 1);
//! assert_eq!(alerts[0].kind, AlertKind::Above);
//! ```

use crate::{
    constants::alerts::{HUMIDITY_MAX_PCT, HUMIDITY_MIN_PCT, TEMPERATURE_MAX_C, TEMPERATURE_MIN_C},
    reading::{Reading, Signal},
};

/// Which side of the band was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlertKind {
    /// Below the minimum
    Below,
    /// Above the maximum
    Above,
}

/// A reading outside its operating band
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    /// Offending signal
    pub signal: Signal,
    /// Offending value
    pub value: f64,
    /// Band minimum
    pub min: f64,
    /// Band maximum
    pub max: f64,
    /// Side crossed
    pub kind: AlertKind,
}

impl core::fmt::Display for Alert {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let unit = self.signal.unit();
        write!(
            f,
            "{} {:.1} {} outside allowed range {} - {} {}",
            self.signal, self.value, unit, self.min, self.max, unit
        )
    }
}

/// Allowed operating band per signal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlertThresholds {
    /// Minimum temperature (°C)
    pub temperature_min: f64,
    /// Maximum temperature (°C)
    pub temperature_max: f64,
    /// Minimum relative humidity (%)
    pub humidity_min: f64,
    /// Maximum relative humidity (%)
    pub humidity_max: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temperature_min: TEMPERATURE_MIN_C,
            temperature_max: TEMPERATURE_MAX_C,
            humidity_min: HUMIDITY_MIN_PCT,
            humidity_max: HUMIDITY_MAX_PCT,
        }
    }
}

impl AlertThresholds {
    /// Create thresholds with custom bands
    ///
    /// Swapped bounds are put back in order.
    pub fn new(temperature: (f64, f64), humidity: (f64, f64)) -> Self {
        let order = |(a, b): (f64, f64)| if a > b { (b, a) } else { (a, b) };
        let (temperature_min, temperature_max) = order(temperature);
        let (humidity_min, humidity_max) = order(humidity);

        Self {
            temperature_min,
            temperature_max,
            humidity_min,
            humidity_max,
        }
    }

    /// Band for one signal
    pub fn band(&self, signal: Signal) -> (f64, f64) {
        match signal {
            Signal::Temperature => (self.temperature_min, self.temperature_max),
            Signal::Humidity => (self.humidity_min, self.humidity_max),
        }
    }

    /// Alerts raised by one reading, temperature first
    pub fn check(&self, reading: &Reading) -> Vec<Alert> {
        Signal::ALL
            .iter()
            .filter_map(|&signal| {
                let (min, max) = self.band(signal);
                check_range(reading.value(signal), min, max).map(|kind| Alert {
                    signal,
                    value: reading.value(signal),
                    min,
                    max,
                    kind,
                })
            })
            .collect()
    }
}

/// Side of `[min, max]` the value falls on, if outside
fn check_range(value: f64, min: f64, max: f64) -> Option<AlertKind> {
    if value < min {
        Some(AlertKind::Below)
    } else if value > max {
        Some(AlertKind::Above)
    } else {
        None
    }
}
