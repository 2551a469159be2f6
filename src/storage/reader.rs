//! Read side of the storage layer

use crate::execution::LazyProducer;
use crate::resolver::Version;

/// Opens committed versions for deferred reading.
///
/// `open_for_read` itself must perform no I/O: it binds a producer to the
/// exact version chosen during resolution, and every failure (including the
/// version having been evicted since it was listed) is reported when the
/// producer is forced.
pub trait VersionReader<PK, PV>: Send + Sync {
    /// Returns an unevaluated producer over the packed records of
    /// `version` under `path`.
    fn open_for_read(&self, path: &str, version: Version) -> LazyProducer<(PK, PV)>;
}
