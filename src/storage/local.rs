//! Local-directory backend
//!
//! Layout under the backend root:
//!
//! ```text
//! <root>/<path>/<version>/manifest.json
//! <root>/<path>/<version>/records.jsonl
//! ```
//!
//! A commit stages everything in a hidden temp directory, fsyncs, and makes
//! the version visible with one atomic rename. A version directory either
//! exists completely or not at all; a crashed write leaves only a temp
//! directory that the next commit of the same version sweeps away.
//!
//! Record files are checksummed at write time and verified on every read.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::checksum::{compute_crc32, format_checksum, parse_checksum};
use super::errors::{StorageError, StorageResult};
use super::manifest::VersionManifest;
use super::reader::VersionReader;
use super::writer::{VersionSink, VersionWriter, WriteOptions};
use crate::catalog::{CatalogError, CatalogResult, MetadataCatalog};
use crate::execution::LazyProducer;
use crate::resolver::Version;

const MANIFEST_FILE: &str = "manifest.json";
const RECORDS_FILE: &str = "records.jsonl";

/// Directory-tree storage backend.
#[derive(Clone, Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Opens a backend rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::Io {
            path: root.display().to_string(),
            reason: format!("failed to create backend root: {}", e),
        })?;
        Ok(Self { root })
    }

    /// Validates a logical path and returns its directory.
    ///
    /// Logical paths are slash-separated names; empty segments, `.` and
    /// `..` are rejected so a path can never escape the root.
    fn path_dir(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty()
            || path
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StorageError::InvalidPath {
                path: path.to_string(),
            });
        }
        let mut dir = self.root.clone();
        for segment in path.split('/') {
            dir.push(segment);
        }
        Ok(dir)
    }

    fn version_dir(&self, path: &str, version: Version) -> StorageResult<PathBuf> {
        Ok(self.path_dir(path)?.join(version.value().to_string()))
    }

    /// Lists committed version directories, ignoring temp directories and
    /// anything that is not a plain version number.
    fn committed_versions(path_dir: &Path) -> Result<Vec<Version>, std::io::Error> {
        let mut versions = Vec::new();
        let entries = match fs::read_dir(path_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(versions),
            Err(e) => return Err(e),
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(raw) = entry.file_name().to_str() {
                if let Ok(value) = raw.parse::<u64>() {
                    versions.push(Version::new(value));
                }
            }
        }
        versions.sort();
        Ok(versions)
    }

    /// Removes the oldest version directories until only `keep` remain.
    fn prune(path: &str, path_dir: &Path, keep: usize) -> StorageResult<()> {
        let io_err = |e: std::io::Error| StorageError::Io {
            path: path.to_string(),
            reason: format!("retention prune failed: {}", e),
        };
        let versions = Self::committed_versions(path_dir).map_err(io_err)?;
        if versions.len() <= keep {
            return Ok(());
        }
        for &version in &versions[..versions.len() - keep] {
            fs::remove_dir_all(path_dir.join(version.value().to_string())).map_err(io_err)?;
            tracing::warn!(path = path, version = %version, "retention evicted version");
        }
        Ok(())
    }
}

impl MetadataCatalog for LocalBackend {
    fn list_versions(&self, path: &str) -> CatalogResult<std::collections::BTreeSet<Version>> {
        let path_dir = self.path_dir(path).map_err(|e| CatalogError::ListFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let versions = Self::committed_versions(&path_dir).map_err(|e| CatalogError::ListFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(versions.into_iter().collect())
    }

    fn version_tag(&self, path: &str, version: Version) -> CatalogResult<Option<String>> {
        let fetch_err = |reason: String| CatalogError::TagFetchFailed {
            path: path.to_string(),
            version,
            reason,
        };
        let version_dir = self
            .version_dir(path, version)
            .map_err(|e| fetch_err(e.to_string()))?;
        if !version_dir.exists() {
            return Err(fetch_err("version no longer present".to_string()));
        }
        let manifest = VersionManifest::read_from_file(&version_dir.join(MANIFEST_FILE), version)
            .map_err(|e| fetch_err(e.to_string()))?;
        Ok(manifest.tag)
    }
}

impl<PK, PV> VersionReader<PK, PV> for LocalBackend
where
    PK: DeserializeOwned + Send + 'static,
    PV: DeserializeOwned + Send + 'static,
{
    fn open_for_read(&self, path: &str, version: Version) -> LazyProducer<(PK, PV)> {
        let backend = self.clone();
        let path = path.to_string();
        LazyProducer::new(move |_ctx| {
            let corrupt = |reason: String| StorageError::Corrupt {
                path: path.clone(),
                version,
                reason,
            };

            let version_dir = backend.version_dir(&path, version)?;
            if !version_dir.exists() {
                return Err(StorageError::VersionNotFound {
                    path: path.clone(),
                    version,
                });
            }

            let manifest =
                VersionManifest::read_from_file(&version_dir.join(MANIFEST_FILE), version)?;
            let expected = parse_checksum(&manifest.records_checksum)
                .ok_or_else(|| corrupt(format!(
                    "manifest checksum {:?} is malformed",
                    manifest.records_checksum
                )))?;

            let bytes = fs::read(version_dir.join(RECORDS_FILE)).map_err(|e| StorageError::Io {
                path: path.clone(),
                reason: format!("failed to read record file: {}", e),
            })?;
            let actual = compute_crc32(&bytes);
            if actual != expected {
                return Err(corrupt(format!(
                    "record checksum mismatch: manifest {}, file {}",
                    format_checksum(expected),
                    format_checksum(actual)
                )));
            }

            let text = String::from_utf8(bytes)
                .map_err(|e| corrupt(format!("record file is not UTF-8: {}", e)))?;
            let mut records = Vec::new();
            for line in text.lines() {
                let record: (PK, PV) = serde_json::from_str(line)
                    .map_err(|e| corrupt(format!("record does not parse: {}", e)))?;
                records.push(record);
            }
            if records.len() as u64 != manifest.record_count {
                return Err(corrupt(format!(
                    "manifest says {} records, file holds {}",
                    manifest.record_count,
                    records.len()
                )));
            }
            Ok(records)
        })
    }
}

impl<PK, PV> VersionWriter<PK, PV> for LocalBackend
where
    PK: Serialize + Send + 'static,
    PV: Serialize + Send + 'static,
{
    fn open_for_write(
        &self,
        path: &str,
        version: Version,
        options: WriteOptions,
    ) -> StorageResult<Box<dyn VersionSink<PK, PV>>> {
        options.validate(path, version)?;

        let write_err = |reason: String| StorageError::WriteFailed {
            path: path.to_string(),
            version,
            reason,
        };

        let path_dir = self.path_dir(path)?;
        let tmp_dir = path_dir.join(format!(".tmp-{}", version.value()));
        if tmp_dir.exists() {
            // Leftover from a crashed write of the same version.
            fs::remove_dir_all(&tmp_dir)
                .map_err(|e| write_err(format!("failed to clear stale temp dir: {}", e)))?;
        }
        fs::create_dir_all(&tmp_dir)
            .map_err(|e| write_err(format!("failed to create temp dir: {}", e)))?;

        let file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(tmp_dir.join(RECORDS_FILE))
            .map_err(|e| write_err(format!("failed to create record file: {}", e)))?;

        Ok(Box::new(LocalSink {
            path: path.to_string(),
            version,
            options,
            path_dir,
            tmp_dir,
            file,
            hasher: crc32fast::Hasher::new(),
            record_count: 0,
            committed: false,
            _records: PhantomData,
        }))
    }
}

struct LocalSink<PK, PV> {
    path: String,
    version: Version,
    options: WriteOptions,
    path_dir: PathBuf,
    tmp_dir: PathBuf,
    file: File,
    hasher: crc32fast::Hasher,
    record_count: u64,
    committed: bool,
    _records: PhantomData<fn() -> (PK, PV)>,
}

impl<PK, PV> LocalSink<PK, PV> {
    fn write_err(&self, reason: String) -> StorageError {
        StorageError::WriteFailed {
            path: self.path.clone(),
            version: self.version,
            reason,
        }
    }
}

impl<PK, PV> VersionSink<PK, PV> for LocalSink<PK, PV>
where
    PK: Serialize + Send + 'static,
    PV: Serialize + Send + 'static,
{
    fn push(&mut self, record: (PK, PV)) -> StorageResult<()> {
        let mut line = serde_json::to_string(&record)
            .map_err(|e| self.write_err(format!("record does not serialize: {}", e)))?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .map_err(|e| self.write_err(format!("failed to append record: {}", e)))?;
        self.hasher.update(line.as_bytes());
        self.record_count += 1;
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> StorageResult<()> {
        self.file
            .sync_all()
            .map_err(|e| self.write_err(format!("failed to fsync record file: {}", e)))?;

        let checksum = format_checksum(self.hasher.clone().finalize());
        let manifest =
            VersionManifest::new(self.version, None, self.record_count, checksum);
        manifest.write_to_file(&self.tmp_dir.join(MANIFEST_FILE))?;

        let final_dir = self.path_dir.join(self.version.value().to_string());
        if final_dir.exists() {
            // Rewriting a version: last writer wins.
            fs::remove_dir_all(&final_dir)
                .map_err(|e| self.write_err(format!("failed to replace version: {}", e)))?;
        }
        fs::rename(&self.tmp_dir, &final_dir)
            .map_err(|e| self.write_err(format!("failed to publish version: {}", e)))?;

        File::open(&self.path_dir)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| self.write_err(format!("failed to fsync path dir: {}", e)))?;

        self.committed = true;
        tracing::debug!(
            path = %self.path,
            version = %self.version,
            records = self.record_count,
            "published version"
        );

        LocalBackend::prune(&self.path, &self.path_dir, self.options.retention_count)
    }
}

impl<PK, PV> Drop for LocalSink<PK, PV> {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_dir_all(&self.tmp_dir);
        }
    }
}
