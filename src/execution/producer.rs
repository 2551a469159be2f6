//! LazyProducer - deferred record production
//!
//! A producer is a single-shot computation bound to one committed version.
//! Constructing it performs no I/O; forcing it runs the captured closure
//! inside the caller's execution environment.
//!
//! Listing metadata and forcing the producer are NOT atomic. Retention may
//! evict the bound version in between, in which case forcing fails with
//! `StorageError::VersionNotFound`. This race is accepted; closing it would
//! need a combined list+open operation from the storage layer.

use std::fmt;

use crate::storage::StorageResult;

use super::ExecutionContext;

/// A single-shot, deferred computation yielding the records of one version.
pub struct LazyProducer<T> {
    thunk: Box<dyn FnOnce(&ExecutionContext) -> StorageResult<Vec<T>> + Send>,
}

impl<T> fmt::Debug for LazyProducer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The thunk is opaque; there is nothing more to show before forcing.
        f.write_str("LazyProducer(..)")
    }
}

impl<T: 'static> LazyProducer<T> {
    /// Wraps a closure that will run when the producer is forced.
    pub fn new<F>(thunk: F) -> Self
    where
        F: FnOnce(&ExecutionContext) -> StorageResult<Vec<T>> + Send + 'static,
    {
        Self {
            thunk: Box::new(thunk),
        }
    }

    /// A producer that yields the given records without touching storage.
    pub fn ready(records: Vec<T>) -> Self
    where
        T: Send,
    {
        Self::new(move |_ctx| Ok(records))
    }

    /// Runs the deferred computation under the given context.
    pub fn force(self, ctx: &ExecutionContext) -> StorageResult<Vec<T>> {
        (self.thunk)(ctx)
    }

    /// Maps every produced record, still deferred.
    pub fn map<U, F>(self, f: F) -> LazyProducer<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + 'static,
    {
        let thunk = self.thunk;
        LazyProducer::new(move |ctx| {
            let records = thunk(ctx)?;
            Ok(records.into_iter().map(&f).collect())
        })
    }
}
