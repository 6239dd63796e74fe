//! Core data model and pattern analysis for ThermoGuard
//!
//! Turns a time-ordered table of temperature/humidity readings into
//! statistical verdicts. Everything here is a pure function of its inputs:
//! no I/O, no logging, no state carried between calls.
//!
//! Key pieces:
//! - [`ReadingSeries`]: validated, timestamp-ordered snapshot of readings
//! - [`stats`]: mean, sample deviation, rolling windows, least-squares slope
//! - [`zscore`]: z-score outlier detection for small series
//! - [`PatternAnalyzer`]: trend and stability classification
//! - [`AlertThresholds`]: fixed operating-range alerts
//!
//! ```
//! use thermoguard_core::{PatternAnalyzer, Reading, ReadingSeries, Trend};
//!
//! let readings = (0..30)
//!     .map(|i| Reading::new(i * 60_000, 20.0 + 0.2 * i as f64, 50.0))
//!     .collect();
//! let series = ReadingSeries::new(readings)?;
//!
//! let result = PatternAnalyzer::default().analyze(&series)?;
//! assert_eq!(result.temperature_trend, Trend::Rising);
//! # Ok::<(), thermoguard_core::AnalysisError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alerts;
pub mod constants;
pub mod errors;
pub mod pattern;
pub mod reading;
pub mod stats;
pub mod time;
pub mod zscore;

// Public API
pub use alerts::{Alert, AlertKind, AlertThresholds};
pub use errors::{AnalysisError, AnalysisResult};
pub use pattern::{PatternAnalyzer, PatternReport, PatternResult, SignalStats, Stability, Trend};
pub use reading::{Reading, ReadingSeries, Signal};
pub use stats::{RollingStat, SeriesSummary, SignalSummary};
pub use time::{FixedTime, SystemTime, TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
