//! Version metadata catalog
//!
//! The catalog is the listing side of the storage layer: which versions
//! exist under a logical path, and the optional sidecar tag written next to
//! legacy-convention versions. The core only consumes it; registering new
//! versions goes through the storage write path, never through the catalog.

mod errors;

pub use errors::{CatalogError, CatalogResult};

use std::collections::BTreeSet;

use crate::resolver::Version;

/// Read-only listing of committed versions and their sidecar tags.
///
/// Listings reflect a point in time: retention may evict a version after it
/// was listed and before its data is opened. Implementations must not hide
/// that by locking.
pub trait MetadataCatalog: Send + Sync {
    /// Returns every committed version under `path`, in order.
    fn list_versions(&self, path: &str) -> CatalogResult<BTreeSet<Version>>;

    /// Returns the sidecar tag for `version` under `path`, if one was
    /// written. Only legacy-convention versions carry a tag.
    fn version_tag(&self, path: &str, version: Version) -> CatalogResult<Option<String>>;
}
