//! Storage error types

use thiserror::Error;

use crate::resolver::Version;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures while opening or committing version data.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The requested version is not present. Also the outcome of losing the
    /// list-then-open race to retention eviction.
    #[error("{version} not found under {path}")]
    VersionNotFound { path: String, version: Version },

    /// Committing a new version failed. Writes are all-or-nothing; no
    /// partial version is left behind.
    #[error("failed to commit {version} under {path}: {reason}")]
    WriteFailed {
        path: String,
        version: Version,
        reason: String,
    },

    /// Stored data failed integrity or format checks on read.
    #[error("corrupt data for {version} under {path}: {reason}")]
    Corrupt {
        path: String,
        version: Version,
        reason: String,
    },

    /// The logical path is not usable by this backend.
    #[error("invalid logical path: {path}")]
    InvalidPath { path: String },

    /// Underlying I/O failure outside a specific version.
    #[error("I/O failure at {path}: {reason}")]
    Io { path: String, reason: String },
}
