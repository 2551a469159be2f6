//! verbatch - versioned batch-store resolution
//!
//! Maps logical batch time onto the monotonic version numbers assigned by a
//! physical storage layer, locates the newest version strictly before a
//! requested batch, and registers new versions as state advances.

pub mod batch;
pub mod catalog;
pub mod execution;
pub mod resolver;
pub mod storage;
pub mod store;
