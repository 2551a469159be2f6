//! VersionResolver - the batch/version mapping in both directions
//!
//! Conventions:
//!
//! - Writing batch `b` produces the version numbered by the earliest instant
//!   of `b.next()`. A version numbered by the start of the *following* batch
//!   unambiguously means "all data up to and including `b` is included".
//! - Reading inverts that: the batch for version `v` is the predecessor of
//!   the batch containing instant `v`.
//! - A legacy tag short-circuits both: the tag text is the upper-bound
//!   BatchId, so the resolved batch is its predecessor.
//!
//! Resolution is pure and infallible. Safe to call concurrently; the only
//! shared state is the immutable batcher.

use std::sync::Arc;

use crate::batch::{BatchId, Batcher, Timestamp};

use super::{Encoding, Version};

/// Converts between BatchIds and storage version numbers.
#[derive(Clone)]
pub struct VersionResolver {
    batcher: Arc<dyn Batcher>,
}

impl VersionResolver {
    /// Creates a resolver over the shared batcher.
    pub fn new(batcher: Arc<dyn Batcher>) -> Self {
        Self { batcher }
    }

    /// Returns the version number under which batch `batch` is committed.
    ///
    /// This is the earliest instant of the following batch, reinterpreted
    /// as a version number. Earliest instants before the epoch clamp to
    /// version 0; anchored batchers with positive windows never produce
    /// them for batches that are actually written.
    pub fn batch_to_version(&self, batch: BatchId) -> Version {
        let earliest = self.batcher.earliest_time_of(batch.next());
        Version::new(earliest.as_millis().max(0) as u64)
    }

    /// Returns the batch committed under version `version`, assuming the
    /// current convention.
    ///
    /// Exact inverse of [`batch_to_version`](Self::batch_to_version) for
    /// versions in timestamp range; larger values clamp to the greatest
    /// representable instant, mirroring the clamp on the write side.
    pub fn version_to_batch(&self, version: Version) -> BatchId {
        let millis = i64::try_from(version.value()).unwrap_or(i64::MAX);
        self.batcher.batch_of(Timestamp::from_millis(millis)).prev()
    }

    /// Returns the batch committed under `version`, reconciling the legacy
    /// convention when a sidecar tag is present.
    ///
    /// Never fails: an absent or unparsable tag falls back to the current
    /// convention.
    pub fn version_to_batch_compat(&self, version: Version, tag: Option<&str>) -> BatchId {
        match Encoding::classify(tag) {
            Encoding::Legacy(upper_bound) => upper_bound.prev(),
            Encoding::Current => self.version_to_batch(version),
        }
    }
}
