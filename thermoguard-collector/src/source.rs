//! Reading sources
//!
//! A source produces at most one temperature/humidity pair per poll. The
//! timestamp is assigned by the caller when the sample is stored.

use crate::CollectError;
use serde::{Deserialize, Serialize};
use thermoguard_core::{Reading, Timestamp};

/// Untimestamped sample from a source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}

impl RawSample {
    /// Create a sample
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Both values are finite
    pub fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.humidity.is_finite()
    }

    /// Stamp the sample
    pub fn at(self, timestamp: Timestamp) -> Reading {
        Reading::new(timestamp, self.temperature, self.humidity)
    }
}

/// Producer of samples, polled once per monitoring cycle
pub trait ReadingSource {
    /// Next sample, or `None` when this cycle produced nothing usable
    ///
    /// Errors are reserved for failures the caller should stop on. Transient
    /// problems such as a garbled line are reported as `None`.
    fn poll(&mut self) -> Result<Option<RawSample>, CollectError>;

    /// Short name for logs
    fn name(&self) -> &'static str {
        "source"
    }
}

impl<S: ReadingSource + ?Sized> ReadingSource for &mut S {
    fn poll(&mut self) -> Result<Option<RawSample>, CollectError> {
        (**self).poll()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<S: ReadingSource + ?Sized> ReadingSource for Box<S> {
    fn poll(&mut self) -> Result<Option<RawSample>, CollectError> {
        (**self).poll()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
