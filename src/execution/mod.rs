//! Execution boundary
//!
//! Resolution only decides *which* version to read; actually producing
//! records is deferred to whatever engine the caller runs. The boundary is
//! explicit: a [`LazyProducer`] performs no work until the caller hands it
//! an [`ExecutionContext`], and the context is the only thing the producer
//! ever learns about its environment.

mod context;
mod producer;

pub use context::{ExecutionContext, ExecutionMode};
pub use producer::LazyProducer;
