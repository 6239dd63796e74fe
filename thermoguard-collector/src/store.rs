//! Reading storage
//!
//! An append-only table keyed by timestamp. Rows come back in ascending
//! timestamp order; rows sharing a timestamp keep their insertion order.

use crate::CollectError;
use thermoguard_core::{AnalysisResult, Reading, ReadingSeries, Timestamp};

/// Append-only reading table
pub trait ReadingStore {
    /// Store one reading
    fn append(&mut self, reading: Reading) -> Result<(), CollectError>;

    /// Readings with `timestamp >= since`, or all of them for `None`
    fn window(&self, since: Option<Timestamp>) -> Vec<Reading>;

    /// Most recent `count` readings, oldest first
    fn latest(&self, count: usize) -> Vec<Reading>;

    /// Delete readings older than `cutoff`, returning how many went
    fn purge_older_than(&mut self, cutoff: Timestamp) -> usize;

    /// Number of stored readings
    fn len(&self) -> usize;

    /// True when nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Window as an analysable series
    fn series(&self, since: Option<Timestamp>) -> AnalysisResult<ReadingSeries> {
        ReadingSeries::new(self.window(since))
    }

    /// Store many readings, stopping at the first rejected one
    fn extend<I>(&mut self, readings: I) -> Result<usize, CollectError>
    where
        I: IntoIterator<Item = Reading>,
        Self: Sized,
    {
        let mut stored = 0;
        for reading in readings {
            self.append(reading)?;
            stored += 1;
        }
        Ok(stored)
    }
}

/// In-memory [`ReadingStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    readings: Vec<Reading>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `capacity` readings
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            readings: Vec::with_capacity(capacity),
        }
    }

    /// All readings in order
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

impl ReadingStore for MemoryStore {
    fn append(&mut self, reading: Reading) -> Result<(), CollectError> {
        if !(reading.temperature.is_finite() && reading.humidity.is_finite()) {
            return Err(CollectError::NonFinite {
                timestamp: reading.timestamp,
            });
        }

        // After every row with the same or an earlier timestamp
        let position = self
            .readings
            .partition_point(|r| r.timestamp <= reading.timestamp);
        self.readings.insert(position, reading);
        Ok(())
    }

    fn window(&self, since: Option<Timestamp>) -> Vec<Reading> {
        let start = match since {
            Some(since) => self.readings.partition_point(|r| r.timestamp < since),
            None => 0,
        };
        self.readings[start..].to_vec()
    }

    fn latest(&self, count: usize) -> Vec<Reading> {
        let start = self.readings.len().saturating_sub(count);
        self.readings[start..].to_vec()
    }

    fn purge_older_than(&mut self, cutoff: Timestamp) -> usize {
        let end = self.readings.partition_point(|r| r.timestamp < cutoff);
        self.readings.drain(..end);
        end
    }

    fn len(&self) -> usize {
        self.readings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filled() -> MemoryStore {
        let mut store = MemoryStore::new();
        for (ts, temp) in [(10, 20.0), (30, 22.0), (20, 21.0), (40, 23.0)] {
            store.append(Reading::new(ts, temp, 50.0)).unwrap();
        }
        store
    }

    #[test]
    fn keeps_timestamp_order() {
        let store = filled();
        let stamps: Vec<_> = store.readings().iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![10, 20, 30, 40]);
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let mut store = MemoryStore::new();
        store.append(Reading::new(5, 1.0, 50.0)).unwrap();
        store.append(Reading::new(5, 2.0, 50.0)).unwrap();
        store.append(Reading::new(1, 0.0, 50.0)).unwrap();

        let temps: Vec<_> = store.readings().iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn window_is_inclusive() {
        let store = filled();
        assert_eq!(store.window(None).len(), 4);
        assert_eq!(store.window(Some(20)).len(), 3);
        assert_eq!(store.window(Some(41)).len(), 0);
        assert_eq!(store.window(Some(0)).len(), 4);
    }

    #[test]
    fn latest_is_oldest_first() {
        let store = filled();
        let latest = store.latest(2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].timestamp, 30);
        assert_eq!(latest[1].timestamp, 40);
        assert_eq!(store.latest(10).len(), 4);
        assert!(store.latest(0).is_empty());
    }

    #[test]
    fn purge_removes_strictly_older() {
        let mut store = filled();
        assert_eq!(store.purge_older_than(30), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.readings()[0].timestamp, 30);
        assert_eq!(store.purge_older_than(0), 0);
    }

    #[test]
    fn rejects_non_finite() {
        let mut store = MemoryStore::new();
        let err = store.append(Reading::new(7, f64::NAN, 50.0)).unwrap_err();
        assert!(matches!(err, CollectError::NonFinite { timestamp: 7 }));
        assert!(store.is_empty());
    }

    #[test]
    fn series_and_extend() {
        let mut store = MemoryStore::with_capacity(8);
        let stored = store
            .extend((0..5).map(|i| Reading::new(i * 100, 20.0 + i as f64, 50.0)))
            .unwrap();
        assert_eq!(stored, 5);

        let series = store.series(Some(200)).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).map(|r| r.timestamp), Some(200));

        store.clear();
        assert!(store.series(None).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn any_insertion_order_reads_back_sorted(
            stamps in prop::collection::vec(0u64..20, 0..60),
            since in 0u64..25,
        ) {
            let mut store = MemoryStore::new();
            // Temperature records the insertion position
            for (i, &ts) in stamps.iter().enumerate() {
                store.append(Reading::new(ts, i as f64, 50.0)).unwrap();
            }

            let mut expected: Vec<(u64, f64)> =
                stamps.iter().enumerate().map(|(i, &ts)| (ts, i as f64)).collect();
            expected.sort_by_key(|&(ts, _)| ts);

            let stored: Vec<(u64, f64)> =
                store.readings().iter().map(|r| (r.timestamp, r.temperature)).collect();
            prop_assert_eq!(&stored, &expected);

            let window = store.window(Some(since));
            prop_assert!(window.iter().all(|r| r.timestamp >= since));
            prop_assert_eq!(window.len(), stamps.iter().filter(|&&ts| ts >= since).count());
            prop_assert!(store.series(Some(since)).is_ok());
        }
    }
}
