//! Version resolution
//!
//! Two numbering conventions coexist in the same metadata store:
//!
//! - **Current**: a version is numbered by the earliest instant of the batch
//!   *after* the one it completes, so the number itself says "everything up
//!   to and including that batch is here".
//! - **Legacy**: the version carries a sidecar tag whose text is the
//!   upper-bound BatchId itself, off by one from the current convention.
//!
//! The resolver maps batches to version numbers, version numbers back to
//! batches, and reconciles the two conventions per version. All of it is
//! pure logic; no I/O happens here.

mod encoding;
mod resolve;
mod version;

pub use encoding::Encoding;
pub use resolve::VersionResolver;
pub use version::Version;
