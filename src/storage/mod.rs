//! Version data access
//!
//! The storage layer is the only thing that actually holds record data. The
//! core consumes two narrow interfaces: open a committed version for
//! deferred reading, and commit a full record set as a new version.
//!
//! # Design Principles
//!
//! - Opening for read performs no I/O; all work waits for the producer to
//!   be forced
//! - A write commits a whole version or nothing (zero partial success)
//! - Retention keeps the newest K versions; eviction is storage's job and
//!   is invisible to the core except that evicted versions stop being listed
//! - Listing and opening are not atomic; eviction can win the race
//!
//! Two backends ship with the crate: [`MemoryBackend`] for tests and
//! embedders, [`LocalBackend`] for a local directory tree.

mod checksum;
mod errors;
mod local;
mod manifest;
mod memory;
mod reader;
mod writer;

pub use checksum::{compute_crc32, format_checksum, parse_checksum};
pub use errors::{StorageError, StorageResult};
pub use local::LocalBackend;
pub use manifest::VersionManifest;
pub use memory::MemoryBackend;
pub use reader::VersionReader;
pub use writer::{VersionSink, VersionWriter, WriteOptions};
