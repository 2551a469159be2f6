//! Version manifest structure and serialization
//!
//! Each committed version carries a `manifest.json` describing what was
//! written:
//!
//! ```json
//! {
//!   "version": 400,
//!   "tag": null,
//!   "created_at": "2026-02-04T11:30:00+00:00",
//!   "record_count": 2,
//!   "records_checksum": "crc32:deadbeef",
//!   "format_version": 1
//! }
//! ```
//!
//! The `tag` field exists so legacy-convention versions keep their sidecar
//! metadata when migrated into this layout; current-convention writes leave
//! it null.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::errors::{StorageError, StorageResult};
use crate::resolver::Version;

/// The authoritative descriptor of one committed version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionManifest {
    /// The storage-assigned version number.
    pub version: u64,

    /// Sidecar tag; present only on legacy-convention versions.
    pub tag: Option<String>,

    /// Creation timestamp, RFC3339.
    pub created_at: String,

    /// Number of records committed.
    pub record_count: u64,

    /// CRC32 checksum of the record file (format: `crc32:XXXXXXXX`).
    pub records_checksum: String,

    /// Manifest format version (always 1).
    pub format_version: u8,
}

impl VersionManifest {
    /// Creates a manifest for a version committed now.
    pub fn new(
        version: Version,
        tag: Option<String>,
        record_count: u64,
        records_checksum: impl Into<String>,
    ) -> Self {
        Self {
            version: version.value(),
            tag,
            created_at: Utc::now().to_rfc3339(),
            record_count,
            records_checksum: records_checksum.into(),
            format_version: 1,
        }
    }

    fn corrupt(path: &Path, version: Version, reason: impl Into<String>) -> StorageError {
        StorageError::Corrupt {
            path: path.display().to_string(),
            version,
            reason: reason.into(),
        }
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::Io {
            path: String::new(),
            reason: format!("failed to serialize manifest: {}", e),
        })
    }

    /// Writes the manifest to `path` with fsync.
    pub fn write_to_file(&self, path: &Path) -> StorageResult<()> {
        let json = self.to_json()?;
        let io_err = |action: &str, e: std::io::Error| StorageError::Io {
            path: path.display().to_string(),
            reason: format!("failed to {} manifest: {}", action, e),
        };

        let mut file = File::create(path).map_err(|e| io_err("create", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| io_err("write", e))?;
        file.sync_all().map_err(|e| io_err("fsync", e))?;
        Ok(())
    }

    /// Reads a manifest from `path`.
    pub fn read_from_file(path: &Path, version: Version) -> StorageResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StorageError::Io {
            path: path.display().to_string(),
            reason: format!("failed to read manifest: {}", e),
        })?;
        let manifest: Self = serde_json::from_str(&content)
            .map_err(|e| Self::corrupt(path, version, format!("manifest does not parse: {}", e)))?;
        if manifest.version != version.value() {
            return Err(Self::corrupt(
                path,
                version,
                format!("manifest claims version {}", manifest.version),
            ));
        }
        Ok(manifest)
    }
}
