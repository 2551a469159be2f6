//! Read and write orchestration over the last-known state
//!
//! `read_last` is stateless request/response: list, resolve, filter, pick
//! the maximum, bind a producer. `write_last` derives the version number
//! from the batch being completed and hands the packed records to storage.
//!
//! Listing metadata and later forcing the producer are not atomic; a
//! version can be evicted by retention in between, and the producer reports
//! that at force time. The store does not lock or retry to close the gap.

use std::sync::Arc;

use crate::batch::{BatchId, Batcher};
use crate::catalog::MetadataCatalog;
use crate::execution::{ExecutionContext, ExecutionMode, LazyProducer};
use crate::resolver::{Version, VersionResolver};
use crate::storage::{VersionReader, VersionWriter, WriteOptions};

use super::codec::{KeyOrder, PairCodec};
use super::errors::{FailureList, ReadError, WriteError};

/// How many versions a write asks storage to retain.
pub const DEFAULT_RETENTION_COUNT: usize = 3;

/// Ephemeral pairing of a resolved batch and its raw version, produced
/// during resolution and never persisted.
#[derive(Copy, Clone, Debug)]
struct CandidateVersion {
    batch: BatchId,
    version: Version,
}

/// Versioned store over the newest-value-per-key state of a batched
/// dataset.
///
/// Generic over logical pairs `(K, V)` and the packed pairs `(PK, PV)` the
/// storage layer holds; the injected [`PairCodec`] converts between them.
pub struct VersionedBatchStore<K, V, PK, PV> {
    path: String,
    resolver: VersionResolver,
    catalog: Arc<dyn MetadataCatalog>,
    reader: Arc<dyn VersionReader<PK, PV>>,
    writer: Arc<dyn VersionWriter<PK, PV>>,
    codec: Arc<dyn PairCodec<K, V, PK, PV>>,
    key_order: Arc<dyn KeyOrder<K>>,
    retention_count: usize,
}

impl<K, V, PK, PV> VersionedBatchStore<K, V, PK, PV>
where
    K: 'static,
    V: 'static,
    PK: 'static,
    PV: 'static,
{
    /// Creates a store for one logical path.
    ///
    /// The batcher must be the same instance (or an equal one) used by
    /// whatever wrote the path before; version numbers only agree when
    /// window boundaries do.
    pub fn new(
        path: impl Into<String>,
        batcher: Arc<dyn Batcher>,
        catalog: Arc<dyn MetadataCatalog>,
        reader: Arc<dyn VersionReader<PK, PV>>,
        writer: Arc<dyn VersionWriter<PK, PV>>,
        codec: Arc<dyn PairCodec<K, V, PK, PV>>,
        key_order: Arc<dyn KeyOrder<K>>,
    ) -> Self {
        Self {
            path: path.into(),
            resolver: VersionResolver::new(batcher),
            catalog,
            reader,
            writer,
            codec,
            key_order,
            retention_count: DEFAULT_RETENTION_COUNT,
        }
    }

    /// Overrides how many versions writes ask storage to retain.
    pub fn with_retention(mut self, retention_count: usize) -> Self {
        self.retention_count = retention_count;
        self
    }

    /// The logical path this store reads and writes.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolution logic, exposed for callers that need the mapping without
    /// going through a read.
    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// Finds the newest committed state strictly before `upper_bound`.
    ///
    /// Returns the batch that state belongs to and an unevaluated producer
    /// bound to exactly that version. Only metadata is touched here; record
    /// I/O waits until the producer is forced.
    ///
    /// Versions whose tag cannot be fetched are skipped; those failures are
    /// reported only if no candidate survives at all.
    pub fn read_last(
        &self,
        upper_bound: BatchId,
        mode: ExecutionMode,
    ) -> Result<(BatchId, LazyProducer<(K, V)>), FailureList> {
        if mode != ExecutionMode::Batch {
            return Err(ReadError::UnsupportedMode {
                path: self.path.clone(),
                mode,
            }
            .into());
        }

        let versions = self
            .catalog
            .list_versions(&self.path)
            .map_err(|e| FailureList::from(ReadError::from(e)))?;

        let mut failures = FailureList::new();
        let mut candidates = Vec::new();
        for version in versions {
            let tag = match self.catalog.version_tag(&self.path, version) {
                Ok(tag) => tag,
                Err(e) => {
                    failures.push(e.into());
                    continue;
                }
            };
            let batch = self.resolver.version_to_batch_compat(version, tag.as_deref());
            if batch < upper_bound {
                candidates.push(CandidateVersion { batch, version });
            }
        }

        // Distinct versions resolving to the same batch only happen with
        // corrupt metadata; the greater raw version wins that tie.
        let chosen = candidates
            .into_iter()
            .max_by_key(|candidate| (candidate.batch, candidate.version));

        match chosen {
            Some(candidate) => {
                tracing::debug!(
                    path = %self.path,
                    batch = %candidate.batch,
                    version = %candidate.version,
                    "selected prior version"
                );
                let packed = self.reader.open_for_read(&self.path, candidate.version);
                let codec = Arc::clone(&self.codec);
                let producer = packed.map(move |pair| codec.decode(pair));
                Ok((candidate.batch, producer))
            }
            None => {
                failures.push(ReadError::NoPriorVersion {
                    path: self.path.clone(),
                    bound: upper_bound,
                });
                Err(failures)
            }
        }
    }

    /// Commits `records` as the completed state of `batch`.
    ///
    /// Records are ordered by the injected key order, packed through the
    /// codec stamped with `batch`, and committed under the version number
    /// derived from it. Storage is told to keep only the configured number
    /// of versions and to tolerate zero record-level failures: any error
    /// fails the whole write with nothing made visible.
    pub fn write_last(
        &self,
        batch: BatchId,
        records: Vec<(K, V)>,
        // The shipped sinks commit synchronously; the context is the seam
        // where an external engine would attach.
        _ctx: &ExecutionContext,
    ) -> Result<(), WriteError> {
        let commit_err = |source| WriteError::Commit {
            path: self.path.clone(),
            batch,
            source,
        };

        let mut records = records;
        records.sort_by(|a, b| self.key_order.cmp(&a.0, &b.0));

        let version = self.resolver.batch_to_version(batch);
        let record_count = records.len();

        let mut sink = self
            .writer
            .open_for_write(
                &self.path,
                version,
                WriteOptions {
                    retention_count: self.retention_count,
                    max_failures: 0,
                },
            )
            .map_err(commit_err)?;
        for pair in records {
            sink.push(self.codec.encode(pair, batch)).map_err(commit_err)?;
        }
        sink.commit().map_err(commit_err)?;

        tracing::info!(
            path = %self.path,
            batch = %batch,
            version = %version,
            records = record_count,
            "committed last-state version"
        );
        Ok(())
    }
}
