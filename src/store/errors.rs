//! Store error types
//!
//! Propagation policy: tag-parse ambiguities never reach here (the resolver
//! absorbs them); absence of eligible data and unsupported modes come back
//! as descriptive errors, never as panics; write failures are fatal for the
//! write with nothing partially committed.

use std::fmt;

use thiserror::Error;

use crate::batch::BatchId;
use crate::catalog::CatalogError;
use crate::execution::ExecutionMode;
use crate::storage::StorageError;

/// A single read-path failure.
#[derive(Debug, Clone, Error)]
pub enum ReadError {
    /// The store was asked to read under a mode it does not support.
    /// Reported before any metadata listing; never retried internally.
    #[error("execution mode \"{mode}\" is not supported for reads of {path}")]
    UnsupportedMode { path: String, mode: ExecutionMode },

    /// No committed version resolves strictly below the requested bound.
    /// The caller decides whether this is fatal (cold start) or not.
    #[error("no version of {path} exists before batch {bound}")]
    NoPriorVersion { path: String, bound: BatchId },

    /// Listing versions or fetching a tag failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Ordered accumulation of read-path failures.
///
/// A read that skips versions because their metadata was unreadable keeps
/// those failures and reports them alongside the final outcome when no
/// candidate survives.
#[derive(Debug, Default)]
pub struct FailureList {
    failures: Vec<ReadError>,
}

impl FailureList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: ReadError) {
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReadError> {
        self.failures.iter()
    }

    pub fn into_inner(self) -> Vec<ReadError> {
        self.failures
    }
}

impl From<ReadError> for FailureList {
    fn from(failure: ReadError) -> Self {
        Self {
            failures: vec![failure],
        }
    }
}

impl fmt::Display for FailureList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "read failed")?;
        for (index, failure) in self.failures.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{}{}", separator, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for FailureList {}

/// A write-path failure. Writes tolerate zero partial failures; whatever
/// went wrong, no new version became visible.
#[derive(Debug, Clone, Error)]
pub enum WriteError {
    #[error("failed to commit batch {batch} to {path}")]
    Commit {
        path: String,
        batch: BatchId,
        #[source]
        source: StorageError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Version;

    #[test]
    fn test_failure_list_display_joins_failures() {
        let mut failures = FailureList::new();
        failures.push(ReadError::Catalog(CatalogError::TagFetchFailed {
            path: "p".to_string(),
            version: Version::new(100),
            reason: "gone".to_string(),
        }));
        failures.push(ReadError::NoPriorVersion {
            path: "p".to_string(),
            bound: BatchId::new(5),
        });

        let display = failures.to_string();
        assert!(display.contains("v100"));
        assert!(display.contains("before batch 5"));
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn test_single_failure_conversion() {
        let failures = FailureList::from(ReadError::UnsupportedMode {
            path: "p".to_string(),
            mode: ExecutionMode::Streaming,
        });
        assert_eq!(failures.len(), 1);
        assert!(failures.to_string().contains("streaming"));
    }
}
