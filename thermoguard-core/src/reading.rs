//! Readings and validated reading series
//!
//! A [`ReadingSeries`] is the immutable snapshot every analysis call works on.
//! Construction enforces the two invariants the statistics rely on:
//!
//! 1. Every temperature and humidity value is finite
//! 2. Timestamps never decrease (duplicates are tolerated)
//!
//! The series is rebuilt from storage for every analysis call and has no
//! identity of its own.

use crate::errors::{AnalysisError, AnalysisResult};
use crate::time::Timestamp;

/// One temperature/humidity sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Milliseconds since the Unix epoch
    pub timestamp: Timestamp,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}

impl Reading {
    /// Create a reading
    pub fn new(timestamp: Timestamp, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
        }
    }

    /// Value of one signal
    pub fn value(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Temperature => self.temperature,
            Signal::Humidity => self.humidity,
        }
    }

    fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.humidity.is_finite()
    }
}

/// The two independently analyzed signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signal {
    /// Air temperature
    Temperature,
    /// Relative humidity
    Humidity,
}

impl Signal {
    /// Both signals, temperature first
    pub const ALL: [Signal; 2] = [Signal::Temperature, Signal::Humidity];

    /// Display unit
    pub fn unit(&self) -> &'static str {
        match self {
            Signal::Temperature => "°C",
            Signal::Humidity => "%",
        }
    }
}

impl core::fmt::Display for Signal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Signal::Temperature => f.write_str("temperature"),
            Signal::Humidity => f.write_str("humidity"),
        }
    }
}

/// Timestamp-ordered readings with finite values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingSeries {
    readings: Vec<Reading>,
}

impl ReadingSeries {
    /// Build a series from readings already in chronological order
    pub fn new(readings: Vec<Reading>) -> AnalysisResult<Self> {
        for (index, reading) in readings.iter().enumerate() {
            if !reading.is_finite() {
                return Err(AnalysisError::NonFiniteValue { index });
            }
            if index > 0 && reading.timestamp < readings[index - 1].timestamp {
                return Err(AnalysisError::OutOfOrder { index });
            }
        }

        Ok(Self { readings })
    }

    /// Build a series from readings in any order
    ///
    /// Readings sharing a timestamp keep their relative order.
    pub fn from_unsorted(mut readings: Vec<Reading>) -> AnalysisResult<Self> {
        readings.sort_by_key(|r| r.timestamp);
        Self::new(readings)
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// True when there are no readings
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// All readings in order
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Reading at `index`
    pub fn get(&self, index: usize) -> Option<&Reading> {
        self.readings.get(index)
    }

    /// Iterate readings in order
    pub fn iter(&self) -> core::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// Column of one signal
    pub fn values(&self, signal: Signal) -> Vec<f64> {
        self.readings.iter().map(|r| r.value(signal)).collect()
    }

    /// Temperature column
    pub fn temperatures(&self) -> Vec<f64> {
        self.values(Signal::Temperature)
    }

    /// Humidity column
    pub fn humidities(&self) -> Vec<f64> {
        self.values(Signal::Humidity)
    }

    /// Oldest and newest timestamps
    pub fn span(&self) -> Option<(Timestamp, Timestamp)> {
        match (self.readings.first(), self.readings.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    /// Consume the series
    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }
}

impl<'a> IntoIterator for &'a ReadingSeries {
    type Item = &'a Reading;
    type IntoIter = core::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

impl TryFrom<Vec<Reading>> for ReadingSeries {
    type Error = AnalysisError;

    fn try_from(readings: Vec<Reading>) -> AnalysisResult<Self> {
        Self::new(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ts: u64, temp: f64, humidity: f64) -> Reading {
        Reading::new(ts, temp, humidity)
    }

    #[test]
    fn accepts_ordered_readings() {
        let series = ReadingSeries::new(vec![
            reading(1000, 20.0, 50.0),
            reading(2000, 21.0, 51.0),
            reading(2000, 21.5, 51.5), // duplicate timestamp is fine
        ])
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.temperatures(), vec![20.0, 21.0, 21.5]);
        assert_eq!(series.humidities(), vec![50.0, 51.0, 51.5]);
        assert_eq!(series.span(), Some((1000, 2000)));
    }

    #[test]
    fn rejects_time_going_backwards() {
        let result = ReadingSeries::new(vec![
            reading(2000, 20.0, 50.0),
            reading(1000, 21.0, 51.0),
        ]);
        assert_eq!(result, Err(AnalysisError::OutOfOrder { index: 1 }));
    }

    #[test]
    fn rejects_non_finite_values() {
        let result = ReadingSeries::new(vec![
            reading(1000, 20.0, 50.0),
            reading(2000, 20.0, f64::NAN),
        ]);
        assert_eq!(result, Err(AnalysisError::NonFiniteValue { index: 1 }));

        let result = ReadingSeries::new(vec![reading(1000, f64::INFINITY, 50.0)]);
        assert_eq!(result, Err(AnalysisError::NonFiniteValue { index: 0 }));
    }

    #[test]
    fn sorts_unsorted_input_stably() {
        let series = ReadingSeries::from_unsorted(vec![
            reading(3000, 23.0, 53.0),
            reading(1000, 21.0, 51.0),
            reading(3000, 24.0, 54.0),
        ])
        .unwrap();

        assert_eq!(series.temperatures(), vec![21.0, 23.0, 24.0]);
    }

    #[test]
    fn empty_series() {
        let series = ReadingSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.span(), None);
        assert!(series.temperatures().is_empty());
    }

    #[test]
    fn signal_selects_column() {
        let r = reading(0, 22.5, 61.0);
        assert_eq!(r.value(Signal::Temperature), 22.5);
        assert_eq!(r.value(Signal::Humidity), 61.0);
        assert_eq!(Signal::Humidity.to_string(), "humidity");
    }
}
