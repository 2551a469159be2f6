//! Catalog error types

use thiserror::Error;

use crate::resolver::Version;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures while listing version metadata.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("failed to list versions under {path}: {reason}")]
    ListFailed { path: String, reason: String },

    #[error("failed to fetch tag for {version} under {path}: {reason}")]
    TagFetchFailed {
        path: String,
        version: Version,
        reason: String,
    },
}
