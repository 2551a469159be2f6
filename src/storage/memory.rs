//! In-memory backend
//!
//! Implements the catalog, reader, and writer interfaces over a shared map.
//! Used by tests and by embedders that do not need durability. Eviction by
//! retention is real here, so the non-atomic list-then-open race is
//! observable exactly as it is against a remote filesystem.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use super::errors::{StorageError, StorageResult};
use super::reader::VersionReader;
use super::writer::{VersionSink, VersionWriter, WriteOptions};
use crate::catalog::{CatalogError, CatalogResult, MetadataCatalog};
use crate::execution::LazyProducer;
use crate::resolver::Version;

struct StoredVersion<PK, PV> {
    tag: Option<String>,
    records: Vec<(PK, PV)>,
}

type PathMap<PK, PV> = HashMap<String, BTreeMap<Version, StoredVersion<PK, PV>>>;

/// Map-backed storage backend. Cheap to clone; clones share state.
pub struct MemoryBackend<PK, PV> {
    inner: Arc<RwLock<PathMap<PK, PV>>>,
}

impl<PK, PV> Clone for MemoryBackend<PK, PV> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<PK, PV> Default for MemoryBackend<PK, PV> {
    fn default() -> Self {
        Self::new()
    }
}

impl<PK, PV> MemoryBackend<PK, PV> {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seeds a version exactly as an older writer would have left it,
    /// sidecar tag included. For migrations and fixtures; normal writes go
    /// through [`VersionWriter`] and never carry a tag.
    pub fn insert_tagged_version(
        &self,
        path: &str,
        version: Version,
        tag: Option<String>,
        records: Vec<(PK, PV)>,
    ) {
        let mut paths = self.inner.write().unwrap_or_else(|e| e.into_inner());
        paths
            .entry(path.to_string())
            .or_default()
            .insert(version, StoredVersion { tag, records });
    }

    /// Removes a version, as retention would. Returns whether it existed.
    pub fn evict(&self, path: &str, version: Version) -> bool {
        let mut paths = self.inner.write().unwrap_or_else(|e| e.into_inner());
        paths
            .get_mut(path)
            .map(|versions| versions.remove(&version).is_some())
            .unwrap_or(false)
    }
}

impl<PK: Send + Sync, PV: Send + Sync> MetadataCatalog for MemoryBackend<PK, PV> {
    fn list_versions(&self, path: &str) -> CatalogResult<BTreeSet<Version>> {
        let paths = self.inner.read().map_err(|_| CatalogError::ListFailed {
            path: path.to_string(),
            reason: "backend lock poisoned".to_string(),
        })?;
        Ok(paths
            .get(path)
            .map(|versions| versions.keys().copied().collect())
            .unwrap_or_default())
    }

    fn version_tag(&self, path: &str, version: Version) -> CatalogResult<Option<String>> {
        let paths = self.inner.read().map_err(|_| CatalogError::TagFetchFailed {
            path: path.to_string(),
            version,
            reason: "backend lock poisoned".to_string(),
        })?;
        paths
            .get(path)
            .and_then(|versions| versions.get(&version))
            .map(|stored| stored.tag.clone())
            .ok_or(CatalogError::TagFetchFailed {
                path: path.to_string(),
                version,
                reason: "version no longer present".to_string(),
            })
    }
}

impl<PK, PV> VersionReader<PK, PV> for MemoryBackend<PK, PV>
where
    PK: Clone + Send + Sync + 'static,
    PV: Clone + Send + Sync + 'static,
{
    fn open_for_read(&self, path: &str, version: Version) -> LazyProducer<(PK, PV)> {
        let backend = self.clone();
        let path = path.to_string();
        LazyProducer::new(move |_ctx| {
            let paths = backend.inner.read().map_err(|_| StorageError::Io {
                path: path.clone(),
                reason: "backend lock poisoned".to_string(),
            })?;
            paths
                .get(&path)
                .and_then(|versions| versions.get(&version))
                .map(|stored| stored.records.clone())
                .ok_or(StorageError::VersionNotFound {
                    path: path.clone(),
                    version,
                })
        })
    }
}

impl<PK, PV> VersionWriter<PK, PV> for MemoryBackend<PK, PV>
where
    PK: Clone + Send + Sync + 'static,
    PV: Clone + Send + Sync + 'static,
{
    fn open_for_write(
        &self,
        path: &str,
        version: Version,
        options: WriteOptions,
    ) -> StorageResult<Box<dyn VersionSink<PK, PV>>> {
        options.validate(path, version)?;
        Ok(Box::new(MemorySink {
            backend: self.clone(),
            path: path.to_string(),
            version,
            options,
            staged: Vec::new(),
        }))
    }
}

struct MemorySink<PK, PV> {
    backend: MemoryBackend<PK, PV>,
    path: String,
    version: Version,
    options: WriteOptions,
    staged: Vec<(PK, PV)>,
}

impl<PK, PV> VersionSink<PK, PV> for MemorySink<PK, PV>
where
    PK: Clone + Send + Sync + 'static,
    PV: Clone + Send + Sync + 'static,
{
    fn push(&mut self, record: (PK, PV)) -> StorageResult<()> {
        self.staged.push(record);
        Ok(())
    }

    fn commit(self: Box<Self>) -> StorageResult<()> {
        let MemorySink {
            backend,
            path,
            version,
            options,
            staged,
        } = *self;

        let mut paths = backend.inner.write().map_err(|_| StorageError::WriteFailed {
            path: path.clone(),
            version,
            reason: "backend lock poisoned".to_string(),
        })?;
        let versions = paths.entry(path.clone()).or_default();
        versions.insert(
            version,
            StoredVersion {
                tag: None,
                records: staged,
            },
        );

        while versions.len() > options.retention_count {
            let oldest = match versions.keys().next().copied() {
                Some(version) => version,
                None => break,
            };
            versions.remove(&oldest);
            tracing::warn!(path = %path, version = %oldest, "retention evicted version");
        }
        Ok(())
    }
}
