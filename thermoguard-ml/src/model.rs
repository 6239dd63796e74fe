//! Pluggable univariate outlier models

use crate::{contamination_threshold, ForestConfig, IsolationForest, MLError, MLResult};

/// Label assigned to one training value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlierLabel {
    /// Whether the value is an outlier
    pub is_outlier: bool,
    /// Model-specific score, higher is more anomalous
    pub score: f64,
}

/// Fit a model on values and label every one of them
///
/// `contamination` is the expected share of outliers, in `(0, 0.5]`.
/// Implementations must be deterministic for a given configuration.
pub trait OutlierModel {
    /// Fit on `values` and return one label per value, in input order
    fn fit_predict(&self, values: &[f64], contamination: f64) -> MLResult<Vec<OutlierLabel>>;
}

impl<M: OutlierModel + ?Sized> OutlierModel for &M {
    fn fit_predict(&self, values: &[f64], contamination: f64) -> MLResult<Vec<OutlierLabel>> {
        (**self).fit_predict(values, contamination)
    }
}

impl<M: OutlierModel + ?Sized> OutlierModel for Box<M> {
    fn fit_predict(&self, values: &[f64], contamination: f64) -> MLResult<Vec<OutlierLabel>> {
        (**self).fit_predict(values, contamination)
    }
}

/// Isolation forest backed [`OutlierModel`]
///
/// A fresh forest is grown on every call. Values scoring above the
/// `1 - contamination` quantile of all scores are outliers.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsolationModel {
    /// Forest parameters
    pub config: ForestConfig,
}

impl IsolationModel {
    /// Create a model with custom forest parameters
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }
}

impl OutlierModel for IsolationModel {
    fn fit_predict(&self, values: &[f64], contamination: f64) -> MLResult<Vec<OutlierLabel>> {
        if !(contamination > 0.0 && contamination <= 0.5) {
            return Err(MLError::InvalidContamination { contamination });
        }

        let mut forest = IsolationForest::new(self.config.clone());
        forest.fit(values)?;

        let scores: Vec<f64> = forest
            .score_samples(values)
            .into_iter()
            .map(|s| s.score)
            .collect();
        let threshold = contamination_threshold(&scores, contamination)?;

        Ok(scores
            .into_iter()
            .map(|score| OutlierLabel {
                is_outlier: score > threshold,
                score,
            })
            .collect())
    }
}
