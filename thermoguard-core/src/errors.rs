//! Error Types for Analysis Failures
//!
//! ## What Counts as an Error
//!
//! Most "bad" inputs are not errors in ThermoGuard. A series that is too short
//! to analyze, a constant signal with zero variance, or an empty table all
//! produce a defined neutral result (empty anomaly sets, `InsufficientData`
//! classifications). Only two kinds of condition are surfaced as `Err`:
//!
//! ### Caller Configuration
//! - `InvalidSensitivity`: sensitivity must be a positive number
//! - `InvalidWindowSize`: the rolling window must hold at least one reading
//!
//! ### Broken Series Invariants
//! - `NonFiniteValue`: NaN or infinity in a temperature/humidity column
//! - `OutOfOrder`: timestamps decrease somewhere in the series
//!
//! A fifth variant, `ModelFailure`, lets pluggable outlier models report a
//! failure without the core depending on any particular model crate.
//!
//! ```rust
//! use thermoguard_core::{AnalysisError, PatternAnalyzer};
//!
//! match PatternAnalyzer::new(0) {
//!     Err(AnalysisError::InvalidWindowSize { window_size }) => assert_eq!(window_size, 0),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! All variants are `Copy` and carry only inline data or `&'static str`.

use thiserror_no_std::Error;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Analysis errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AnalysisError {
    /// Sensitivity was zero, negative or not a number
    #[error("Invalid sensitivity {sensitivity}: must be a positive number")]
    InvalidSensitivity {
        /// The rejected sensitivity
        sensitivity: f64,
    },

    /// Rolling window cannot be empty
    #[error("Invalid window size {window_size}: must be at least 1")]
    InvalidWindowSize {
        /// The rejected window size
        window_size: usize,
    },

    /// A reading carried NaN or infinity
    #[error("Non-finite value in reading {index}")]
    NonFiniteValue {
        /// Position of the offending reading
        index: usize,
    },

    /// Timestamps went backwards
    #[error("Reading {index} is older than its predecessor")]
    OutOfOrder {
        /// Position of the first out-of-order reading
        index: usize,
    },

    /// An outlier model could not produce labels
    #[error("Outlier model failed: {reason}")]
    ModelFailure {
        /// Static description from the model
        reason: &'static str,
    },
}

/// Reject non-positive or NaN sensitivities
pub fn check_sensitivity(sensitivity: f64) -> AnalysisResult<()> {
    // NaN fails the comparison
    if sensitivity > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidSensitivity { sensitivity })
    }
}

/// Reject empty rolling windows
pub fn check_window_size(window_size: usize) -> AnalysisResult<()> {
    if window_size == 0 {
        Err(AnalysisError::InvalidWindowSize { window_size })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitivity_must_be_positive() {
        assert!(check_sensitivity(3.0).is_ok());
        assert!(check_sensitivity(0.001).is_ok());
        assert_eq!(
            check_sensitivity(0.0),
            Err(AnalysisError::InvalidSensitivity { sensitivity: 0.0 })
        );
        assert!(check_sensitivity(-1.5).is_err());
        assert!(check_sensitivity(f64::NAN).is_err());
        assert!(check_sensitivity(f64::INFINITY).is_ok());
    }

    #[test]
    fn window_must_hold_a_reading() {
        assert!(check_window_size(1).is_ok());
        assert_eq!(
            check_window_size(0),
            Err(AnalysisError::InvalidWindowSize { window_size: 0 })
        );
    }

    #[test]
    fn messages_name_the_problem() {
        let err = AnalysisError::OutOfOrder { index: 4 };
        assert_eq!(err.to_string(), "Reading 4 is older than its predecessor");
    }
}
