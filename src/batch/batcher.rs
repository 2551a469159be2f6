//! Batcher - conversion between physical time and logical batches
//!
//! The batcher is the single authority on window boundaries. Every component
//! of the store holds the same batcher instance, so version numbers derived
//! from batch boundaries agree across readers and writers.

use std::fmt;

use super::{BatchId, Timestamp};

/// Converts between physical timestamps and the logical batches containing
/// them.
///
/// Implementations must be pure: the same input always yields the same
/// output, and `earliest_time_of` must be consistent with `batch_of`
/// (`batch_of(earliest_time_of(b)) == b` for every batch `b`).
pub trait Batcher: Send + Sync {
    /// Returns the batch containing the given instant.
    fn batch_of(&self, instant: Timestamp) -> BatchId;

    /// Returns the earliest instant covered by the given batch.
    fn earliest_time_of(&self, batch: BatchId) -> Timestamp;
}

/// A batcher with fixed-width windows anchored at the Unix epoch.
///
/// Batch `b` covers `[b * window, (b + 1) * window)` in milliseconds.
/// Floor division keeps instants before the epoch in the correct window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DurationBatcher {
    window_millis: i64,
}

impl DurationBatcher {
    /// Creates a batcher with the given window length in milliseconds.
    ///
    /// # Panics
    ///
    /// Panics if `window_millis` is not positive.
    pub fn new(window_millis: i64) -> Self {
        assert!(window_millis > 0, "batch window must be positive");
        Self { window_millis }
    }

    /// One-hour windows.
    pub fn hourly() -> Self {
        Self::new(3_600_000)
    }

    /// One-day windows.
    pub fn daily() -> Self {
        Self::new(86_400_000)
    }

    /// Returns the window length in milliseconds.
    #[inline]
    pub fn window_millis(&self) -> i64 {
        self.window_millis
    }
}

impl fmt::Display for DurationBatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DurationBatcher({}ms)", self.window_millis)
    }
}

impl Batcher for DurationBatcher {
    fn batch_of(&self, instant: Timestamp) -> BatchId {
        BatchId::new(instant.as_millis().div_euclid(self.window_millis))
    }

    fn earliest_time_of(&self, batch: BatchId) -> Timestamp {
        Timestamp::from_millis(batch.value() * self.window_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_of_floor_divides() {
        let batcher = DurationBatcher::new(100);
        assert_eq!(batcher.batch_of(Timestamp::from_millis(0)), BatchId::new(0));
        assert_eq!(batcher.batch_of(Timestamp::from_millis(99)), BatchId::new(0));
        assert_eq!(batcher.batch_of(Timestamp::from_millis(100)), BatchId::new(1));
        assert_eq!(batcher.batch_of(Timestamp::from_millis(250)), BatchId::new(2));
    }

    #[test]
    fn test_negative_instants_land_in_negative_batches() {
        let batcher = DurationBatcher::new(100);
        assert_eq!(batcher.batch_of(Timestamp::from_millis(-1)), BatchId::new(-1));
        assert_eq!(
            batcher.batch_of(Timestamp::from_millis(-100)),
            BatchId::new(-1)
        );
        assert_eq!(
            batcher.batch_of(Timestamp::from_millis(-101)),
            BatchId::new(-2)
        );
    }

    #[test]
    fn test_earliest_time_is_window_start() {
        let batcher = DurationBatcher::new(100);
        assert_eq!(
            batcher.earliest_time_of(BatchId::new(3)),
            Timestamp::from_millis(300)
        );
        assert_eq!(
            batcher.earliest_time_of(BatchId::new(-1)),
            Timestamp::from_millis(-100)
        );
    }

    #[test]
    fn test_batch_of_earliest_time_round_trips() {
        let batcher = DurationBatcher::hourly();
        for raw in [-5, -1, 0, 1, 17, 1_000] {
            let batch = BatchId::new(raw);
            assert_eq!(batcher.batch_of(batcher.earliest_time_of(batch)), batch);
        }
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(DurationBatcher::hourly().window_millis(), 3_600_000);
        assert_eq!(DurationBatcher::daily().window_millis(), 86_400_000);
    }

    #[test]
    #[should_panic(expected = "batch window must be positive")]
    fn test_zero_window_rejected() {
        DurationBatcher::new(0);
    }
}
