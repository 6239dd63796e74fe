//! Collection Side of ThermoGuard
//!
//! ## Overview
//!
//! The analysis crates are pure functions over a
//! [`ReadingSeries`](thermoguard_core::ReadingSeries). Everything
//! that produces, keeps, or schedules readings lives here:
//!
//! ```text
//! ReadingSource ──poll──▶ Monitor ──append──▶ ReadingStore
//!                            │                     │
//!                            │◀──── window ────────┘
//!                            ▼
//!             AnomalyDetector + PatternAnalyzer + AlertThresholds
//!                            │
//!                            ▼
//!                     MonitorSnapshot
//! ```
//!
//! ## Sources
//!
//! | Source              | Use                                             |
//! |---------------------|-------------------------------------------------|
//! | [`MockGenerator`]   | Random walk with drift, day cycle, and spikes   |
//! | [`SerialSource`]    | `"Temperature: XX.X, Humidity: YY.Y"` lines     |
//!
//! A source returns `Ok(None)` when a cycle produced nothing usable. The
//! monitor then skips the cycle: nothing is stored and nothing is imputed.
//!
//! ## Storage
//!
//! [`ReadingStore`] is an append-only table ordered by timestamp.
//! [`MemoryStore`] is the in-process implementation.
//!
//! ## Logging
//!
//! This crate logs through the `log` facade and installs no logger. Malformed
//! serial lines and read failures are reported at `warn`, stored readings and
//! analysis summaries at `debug`, alerts and purges at `info`.
//!
//! ## Example Usage
//!
//! ```rust
//! use thermoguard_collector::{MemoryStore, MockGenerator, Monitor, MonitorConfig, ReadingStore};
//! use thermoguard_core::FixedTime;
//!
//! let source = MockGenerator::seeded(7);
//! let mut monitor = Monitor::new(
//!     source,
//!     MemoryStore::new(),
//!     FixedTime::new(1_700_000_000_000),
//!     MonitorConfig::default(),
//! )?;
//!
//! let snapshot = monitor.tick()?;
//! assert!(snapshot.current.is_some());
//! assert_eq!(monitor.store().len(), 1);
//! # Ok::<(), thermoguard_collector::MonitorError>(())
//! ```

pub mod config;
pub mod mock;
pub mod monitor;
pub mod serial;
pub mod source;
pub mod store;

// Re-export common types
pub use config::{MonitorConfig, Timeframe};
pub use mock::{GeneratorConfig, GeneratorState, MockGenerator};
pub use monitor::{Monitor, MonitorError, MonitorSnapshot, MonitorStats};
pub use serial::{format_command, parse_sensor_line, send_command, ParseError, SerialSource, SerialStats};
pub use source::{RawSample, ReadingSource};
pub use store::{MemoryStore, ReadingStore};

use thermoguard_core::Timestamp;
use thiserror::Error;

/// Common collector errors
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reading at {timestamp} has a non-finite value")]
    NonFinite { timestamp: Timestamp },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
