//! Time handling for readings
//!
//! Readings are stamped with wall-clock milliseconds. The clock is abstracted
//! so the collector loop can run against a fixed, hand-advanced clock in tests:
//! - System clock for live collection
//! - Fixed clock for tests and historical backfill

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Milliseconds in one minute
pub const MS_PER_MINUTE: u64 = 60_000;

/// Milliseconds in one hour
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time
    fn is_wall_clock(&self) -> bool;
}

/// System time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock stopped at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }
}

/// Start of a look-back window of `hours` ending at `now`
///
/// `hours == 0` means "all history" and yields `None`.
pub fn lookback_start(now: Timestamp, hours: u64) -> Option<Timestamp> {
    if hours == 0 {
        None
    } else {
        Some(now.saturating_sub(hours.saturating_mul(MS_PER_HOUR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(10);
        assert_eq!(time.now(), 10);
    }

    #[test]
    fn system_time_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemTime.now() > 1_577_836_800_000);
        assert!(SystemTime.is_wall_clock());
    }

    #[test]
    fn lookback_window() {
        let now = 10 * MS_PER_HOUR;
        assert_eq!(lookback_start(now, 0), None);
        assert_eq!(lookback_start(now, 1), Some(9 * MS_PER_HOUR));
        // Saturates instead of wrapping before the epoch
        assert_eq!(lookback_start(now, 24), Some(0));
    }
}
