//! Polling monitor
//!
//! One [`Monitor::tick`] is one collection cycle:
//!
//! 1. Poll the source once
//! 2. Store the sample, stamped with the monitor's clock
//! 3. Read back the configured timeframe as a series
//! 4. Detect anomalies and classify patterns over that series
//! 5. Check the new reading against the operating bands
//!
//! A cycle without a usable sample stops after step 1. Nothing is stored and
//! the snapshot carries no reading.

use crate::{CollectError, MonitorConfig, ReadingSource, ReadingStore};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;
use thermoguard_core::{
    Alert, AnalysisError, PatternAnalyzer, PatternResult, Reading, TimeSource,
};
use thermoguard_ml::{AnomalyDetector, AnomalyResult, IsolationModel};
use thiserror::Error;

/// Monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    /// Reading collected this cycle
    pub current: Option<Reading>,
    /// Most recent stored readings, oldest first
    pub latest: Vec<Reading>,
    /// Anomalies over the analysed window
    pub anomalies: AnomalyResult,
    /// Trend/stability over the analysed window
    pub patterns: PatternResult,
    /// Bands crossed by the current reading
    pub alerts: Vec<Alert>,
}

impl MonitorSnapshot {
    /// Snapshot of a cycle that produced no reading
    pub fn absent() -> Self {
        Self {
            current: None,
            latest: Vec::new(),
            anomalies: AnomalyResult::empty(),
            patterns: PatternResult::insufficient_data(),
            alerts: Vec::new(),
        }
    }

    /// True when the cycle stored a reading
    pub fn has_reading(&self) -> bool {
        self.current.is_some()
    }
}

/// Cycle counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    /// Cycles run
    pub ticks: u64,
    /// Readings stored
    pub stored: u64,
    /// Cycles without a usable reading
    pub absent: u64,
    /// Alerts raised
    pub alerts: u64,
    /// Readings dropped by retention
    pub purged: u64,
}

/// Collect, store, analyze loop over pluggable parts
#[derive(Debug)]
pub struct Monitor<S, St, T> {
    source: S,
    store: St,
    clock: T,
    config: MonitorConfig,
    detector: AnomalyDetector,
    analyzer: PatternAnalyzer,
    stats: MonitorStats,
}

impl<S, St, T> Monitor<S, St, T>
where
    S: ReadingSource,
    St: ReadingStore,
    T: TimeSource,
{
    /// Create a monitor, validating the configuration
    pub fn new(source: S, store: St, clock: T, config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;

        let detector = AnomalyDetector::with_model(IsolationModel::new(config.forest.clone()));
        let analyzer = PatternAnalyzer::new(config.window_size)?;

        Ok(Self {
            source,
            store,
            clock,
            config,
            detector,
            analyzer,
            stats: MonitorStats::default(),
        })
    }

    /// Settings in use
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Counters so far
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Underlying store
    pub fn store(&self) -> &St {
        &self.store
    }

    /// Underlying store, for backfill or maintenance
    pub fn store_mut(&mut self) -> &mut St {
        &mut self.store
    }

    /// Underlying source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Clock used to stamp readings
    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    /// Take everything back apart
    pub fn into_parts(self) -> (S, St, T) {
        (self.source, self.store, self.clock)
    }

    /// Run one collection cycle
    pub fn tick(&mut self) -> Result<MonitorSnapshot, MonitorError> {
        self.stats.ticks += 1;

        let sample = match self.source.poll()? {
            Some(sample) if sample.is_finite() => sample,
            Some(sample) => {
                warn!(
                    "Discarding non-finite sample from {}: {:?}",
                    self.source.name(),
                    sample
                );
                self.stats.absent += 1;
                return Ok(MonitorSnapshot::absent());
            }
            None => {
                warn!("No valid reading from {} this cycle", self.source.name());
                self.stats.absent += 1;
                return Ok(MonitorSnapshot::absent());
            }
        };

        let now = self.clock.now();
        let reading = sample.at(now);
        self.store.append(reading)?;
        self.stats.stored += 1;
        debug!(
            "Stored reading at {}: {:.1} °C, {:.1} %",
            now, reading.temperature, reading.humidity
        );

        if let Some(cutoff) = self.config.retention_cutoff(now) {
            let purged = self.store.purge_older_than(cutoff);
            if purged > 0 {
                self.stats.purged += purged as u64;
                info!("Purged {} readings older than {}", purged, cutoff);
            }
        }

        let latest = self.store.latest(self.config.latest_count);
        let series = self.store.series(self.config.timeframe.since(now))?;

        let anomalies = self.detector.detect(&series, self.config.sensitivity)?;
        let patterns = self.analyzer.analyze(&series)?;
        debug!(
            "Analysed {} readings ({:?}): {} temperature and {} humidity anomalies",
            series.len(),
            anomalies.method,
            anomalies.temperature.len(),
            anomalies.humidity.len()
        );

        let alerts = self.config.thresholds.check(&reading);
        for alert in &alerts {
            info!("Alert: {}", alert);
        }
        self.stats.alerts += alerts.len() as u64;

        Ok(MonitorSnapshot {
            current: Some(reading),
            latest,
            anomalies,
            patterns,
            alerts,
        })
    }

    /// Tick until `on_tick` returns `false`, pausing between cycles
    ///
    /// Errors end the loop and are returned.
    pub fn run<F>(&mut self, mut on_tick: F) -> Result<(), MonitorError>
    where
        F: FnMut(&MonitorSnapshot) -> bool,
    {
        let pause = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            let snapshot = self.tick()?;
            if !on_tick(&snapshot) {
                return Ok(());
            }
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }
    }
}
