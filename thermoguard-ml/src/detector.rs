//! Size-adaptive anomaly detection over a reading series
//!
//! Every call is self-contained: the detector keeps no state between calls,
//! and the forest path is seeded so the same series always gives the same
//! answer.

use crate::{IsolationModel, OutlierModel};
use thermoguard_core::{
    constants::{MAX_CONTAMINATION, MIN_CONTAMINATION, MIN_DETECTION_READINGS, ZSCORE_MAX_READINGS},
    errors::check_sensitivity,
    zscore, AnalysisResult, Reading, ReadingSeries, Signal,
};

/// Expected outlier share for the forest path
///
/// `clamp(1 / sensitivity, 0.01, 0.1)`. Higher sensitivity flags fewer
/// readings.
pub fn contamination_for(sensitivity: f64) -> f64 {
    (1.0 / sensitivity).clamp(MIN_CONTAMINATION, MAX_CONTAMINATION)
}

/// Method used for one detection call
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectionMethod {
    /// Sample z-score against the raw sensitivity threshold
    ZScore,
    /// Per-signal outlier model with the derived contamination
    IsolationForest {
        /// Share of readings the model was asked to flag
        contamination: f64,
    },
}

/// Why a reading was flagged
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnomalyScore {
    /// Absolute z-score
    ZScore(f64),
    /// Labeled outlier by the model
    Outlier {
        /// Model score behind the label
        isolation_score: f64,
    },
}

impl AnomalyScore {
    /// Numeric magnitude, whatever the method
    pub fn value(&self) -> f64 {
        match *self {
            AnomalyScore::ZScore(z) => z,
            AnomalyScore::Outlier { isolation_score } => isolation_score,
        }
    }
}

/// One flagged reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnomalyRecord {
    /// Position in the analysed series
    pub index: usize,
    /// The reading itself
    pub reading: Reading,
    /// Score behind the decision
    pub score: AnomalyScore,
}

/// Anomalies per signal, each in series order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnomalyResult {
    /// Method used, `None` below the detection floor
    pub method: Option<DetectionMethod>,
    /// Temperature anomalies
    pub temperature: Vec<AnomalyRecord>,
    /// Humidity anomalies
    pub humidity: Vec<AnomalyRecord>,
}

impl AnomalyResult {
    /// Result with nothing flagged and no method
    pub fn empty() -> Self {
        Self::default()
    }

    /// Anomalies of one signal
    pub fn signal(&self, signal: Signal) -> &[AnomalyRecord] {
        match signal {
            Signal::Temperature => &self.temperature,
            Signal::Humidity => &self.humidity,
        }
    }

    /// True when neither signal has anomalies
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty() && self.humidity.is_empty()
    }

    /// Total flagged entries, counting a reading once per signal
    pub fn len(&self) -> usize {
        self.temperature.len() + self.humidity.len()
    }
}

/// Picks z-score or the outlier model by series length
///
/// | Readings  | Method                                          |
/// |-----------|-------------------------------------------------|
/// | `< 10`    | nothing flagged                                 |
/// | `10..50`  | `z > sensitivity`                               |
/// | `>= 50`   | model with `contamination_for(sensitivity)`     |
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector<M = IsolationModel> {
    model: M,
}

impl AnomalyDetector {
    /// Detector backed by the default seeded isolation forest
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: OutlierModel> AnomalyDetector<M> {
    /// Detector backed by a custom outlier model
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    /// Model used for large series
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Flag anomalous readings in each signal independently
    ///
    /// Sensitivity is checked before anything else, so a non-positive or NaN
    /// value fails even for a series too short to analyse.
    pub fn detect(&self, series: &ReadingSeries, sensitivity: f64) -> AnalysisResult<AnomalyResult> {
        check_sensitivity(sensitivity)?;

        let n = series.len();
        if n < MIN_DETECTION_READINGS {
            return Ok(AnomalyResult::empty());
        }

        if n < ZSCORE_MAX_READINGS {
            return Ok(AnomalyResult {
                method: Some(DetectionMethod::ZScore),
                temperature: zscore_records(series, Signal::Temperature, sensitivity),
                humidity: zscore_records(series, Signal::Humidity, sensitivity),
            });
        }

        let contamination = contamination_for(sensitivity);
        Ok(AnomalyResult {
            method: Some(DetectionMethod::IsolationForest { contamination }),
            temperature: self.model_records(series, Signal::Temperature, contamination)?,
            humidity: self.model_records(series, Signal::Humidity, contamination)?,
        })
    }

    fn model_records(
        &self,
        series: &ReadingSeries,
        signal: Signal,
        contamination: f64,
    ) -> AnalysisResult<Vec<AnomalyRecord>> {
        let labels = self.model.fit_predict(&series.values(signal), contamination)?;

        Ok(labels
            .into_iter()
            .zip(series.iter())
            .enumerate()
            .filter(|(_, (label, _))| label.is_outlier)
            .map(|(index, (label, reading))| AnomalyRecord {
                index,
                reading: *reading,
                score: AnomalyScore::Outlier {
                    isolation_score: label.score,
                },
            })
            .collect())
    }
}

fn zscore_records(series: &ReadingSeries, signal: Signal, threshold: f64) -> Vec<AnomalyRecord> {
    zscore::outliers(&series.values(signal), threshold)
        .into_iter()
        .filter_map(|hit| {
            series.get(hit.index).map(|reading| AnomalyRecord {
                index: hit.index,
                reading: *reading,
                score: AnomalyScore::ZScore(hit.zscore),
            })
        })
        .collect()
}
