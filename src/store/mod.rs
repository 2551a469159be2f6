//! VersionedBatchStore - the read/write contract
//!
//! Composition root wiring the resolver, the metadata catalog, and the
//! storage interfaces into two operations:
//!
//! - `read_last`: find the newest version strictly before an exclusive
//!   upper-bound batch and return it as an unevaluated record producer
//! - `write_last`: commit a record set as the version derived from the
//!   batch being completed
//!
//! # Design Principles
//!
//! - Reads are pure request/response; no state is kept between calls
//! - No I/O during resolution, only metadata listing
//! - Key ordering and record packing are injected capabilities, not
//!   ambient trait bounds
//! - Unsupported execution modes fail before any metadata is touched

mod codec;
mod errors;
mod last;

pub use codec::{IdentityCodec, KeyOrder, NaturalOrder, PairCodec};
pub use errors::{FailureList, ReadError, WriteError};
pub use last::{VersionedBatchStore, DEFAULT_RETENTION_COUNT};
