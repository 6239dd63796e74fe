//! Size-Adaptive Anomaly Detection for Temperature/Humidity Series
//!
//! ## Overview
//!
//! This crate decides which readings of a series are anomalous. Two methods
//! are used, chosen by how many readings there are:
//!
//! | Readings  | Method           | What `sensitivity` means                 |
//! |-----------|------------------|------------------------------------------|
//! | `< 10`    | none             | nothing is flagged                       |
//! | `10..50`  | z-score          | raw threshold on `|value - mean| / std`  |
//! | `>= 50`   | isolation forest | inverted into `clamp(1/s, 0.01, 0.1)`    |
//!
//! The z-score path uses sensitivity directly as a threshold while the forest
//! path inverts it into the expected fraction of anomalous readings. Within
//! the recognized 1.0-5.0 range the fraction is always pinned at 10%, so
//! sensitivity only starts to matter for the forest above 10.
//!
//! Temperature and humidity are always modelled separately. A reading can be
//! anomalous in one signal, both, or neither.
//!
//! ## Why Isolation Forest?
//!
//! 1. **Unsupervised**: No labeled data required
//! 2. **Small Model**: Only stores tree structures, not training data
//! 3. **Fast Inference**: O(log n) per prediction
//! 4. **Interpretable**: Anomaly scores have a fixed meaning
//!
//! ### How Isolation Forest Works
//!
//! The algorithm isolates values by randomly partitioning them:
//! ```text
//! Normal values: Need many partitions to isolate
//! Anomalies:     Isolated with few partitions
//!
//! Anomaly Score = 2^(-path_length / average_path_length)
//! ```
//!
//! Each tree is grown on a sub-sample of at most 256 values, to a height of
//! `ceil(log2(sub_sample))`. A fixed seed makes every fit reproducible.
//!
//! ## Usage
//!
//! ```rust
//! use thermoguard_core::{Reading, ReadingSeries};
//! use thermoguard_ml::AnomalyDetector;
//!
//! let readings = (0..120u64)
//!     .map(|i| {
//!         let temp = if i == 60 { 31.0 } else { 22.0 + (i % 5) as f64 * 0.1 };
//!         Reading::new(i * 300_000, temp, 55.0 + (i % 7) as f64 * 0.2)
//!     })
//!     .collect();
//! let series = ReadingSeries::new(readings)?;
//!
//! let result = AnomalyDetector::new().detect(&series, 3.0)?;
//! assert!(result.temperature.iter().any(|a| a.index == 60));
//! # Ok::<(), thermoguard_core::AnalysisError>(())
//! ```
//!
//! ## Pluggable Models
//!
//! The large-series path only needs "fit a univariate outlier model with a
//! contamination fraction and a fixed seed, label every value". That contract
//! is the [`OutlierModel`] trait; [`IsolationModel`] is the default and
//! [`AnomalyDetector::with_model`] accepts any other implementation.

#![deny(unsafe_code)]

pub mod detector;
pub mod forest;
pub mod model;
pub mod node;
pub mod scoring;
pub mod tree;

pub use detector::{
    contamination_for, AnomalyDetector, AnomalyRecord, AnomalyResult, AnomalyScore,
    DetectionMethod,
};
pub use forest::{ForestConfig, ForestStats, IsolationForest};
pub use model::{IsolationModel, OutlierLabel, OutlierModel};
pub use node::{c_factor, Node, NodeType};
pub use scoring::{calculate_anomaly_score, contamination_threshold, quantile, IsolationScore};
pub use tree::{IsolationTree, TreeConfig};

use thermoguard_core::AnalysisError;
use thiserror_no_std::Error;

/// Default number of trees in a forest
pub const DEFAULT_NUM_TREES: usize = 100;

/// Default sub-sample size per tree
pub const DEFAULT_SAMPLE_SIZE: usize = 256;

/// Default seed, fixed so repeated fits agree
pub const DEFAULT_SEED: u64 = 42;

/// Result type for model operations
pub type MLResult<T> = Result<T, MLError>;

/// Model errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MLError {
    /// Nothing to train on
    #[error("Insufficient data to fit model")]
    InsufficientData,

    /// Contamination outside (0, 0.5]
    #[error("Contamination {contamination} outside (0, 0.5]")]
    InvalidContamination {
        /// Rejected fraction
        contamination: f64,
    },

    /// Unusable configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl MLError {
    /// Static description for error conversion
    pub fn reason(&self) -> &'static str {
        match self {
            MLError::InsufficientData => "insufficient data to fit model",
            MLError::InvalidContamination { .. } => "contamination outside (0, 0.5]",
            MLError::InvalidConfig(reason) => *reason,
        }
    }
}

impl From<MLError> for AnalysisError {
    fn from(err: MLError) -> Self {
        AnalysisError::ModelFailure {
            reason: err.reason(),
        }
    }
}
