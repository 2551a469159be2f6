//! Write side of the storage layer

use super::errors::{StorageError, StorageResult};
use crate::resolver::Version;

/// Options for committing a new version.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Keep only this many newest versions after the commit. Must be at
    /// least 1.
    pub retention_count: usize,
    /// Tolerated record-level write failures. The store always passes 0;
    /// backends reject anything else.
    pub max_failures: usize,
}

impl WriteOptions {
    /// Options keeping the newest `retention_count` versions, with zero
    /// failure tolerance.
    pub fn keeping(retention_count: usize) -> Self {
        Self {
            retention_count,
            max_failures: 0,
        }
    }

    /// Rejects option combinations no shipped backend supports.
    pub(crate) fn validate(&self, path: &str, version: Version) -> StorageResult<()> {
        if self.max_failures != 0 {
            return Err(StorageError::WriteFailed {
                path: path.to_string(),
                version,
                reason: format!(
                    "write-failure tolerance {} is not supported; only 0 is",
                    self.max_failures
                ),
            });
        }
        if self.retention_count == 0 {
            return Err(StorageError::WriteFailed {
                path: path.to_string(),
                version,
                reason: "retention must keep at least one version".to_string(),
            });
        }
        Ok(())
    }
}

/// Accumulates the records of one version and commits them atomically.
///
/// Dropping a sink without committing discards everything staged; no
/// partially written version ever becomes visible.
pub trait VersionSink<PK, PV>: Send {
    /// Stages one packed record.
    fn push(&mut self, record: (PK, PV)) -> StorageResult<()>;

    /// Commits all staged records as the version this sink was opened for,
    /// then applies retention.
    fn commit(self: Box<Self>) -> StorageResult<()>;
}

/// Opens sinks for committing new versions.
pub trait VersionWriter<PK, PV>: Send + Sync {
    /// Opens a sink that will commit `version` under `path`.
    ///
    /// Fails fast when the options are unsupported (a nonzero failure
    /// tolerance, or a retention count of zero).
    fn open_for_write(
        &self,
        path: &str,
        version: Version,
        options: WriteOptions,
    ) -> StorageResult<Box<dyn VersionSink<PK, PV>>>;
}
