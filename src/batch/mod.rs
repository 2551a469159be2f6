//! Logical time model
//!
//! A batched dataset advances in discrete units of logical time. Each unit
//! is identified by a `BatchId` and covers a half-open span of physical
//! `Timestamp`s; the `Batcher` converts between the two.
//!
//! # Design Principles
//!
//! - BatchIds are totally ordered and discrete (successor/predecessor)
//! - A BatchId represents "all events before this identifier"
//! - The Batcher is pure and immutable; it is shared across every component
//!   that needs to agree on window boundaries

mod batch_id;
mod batcher;
mod timestamp;

pub use batch_id::BatchId;
pub use batcher::{Batcher, DurationBatcher};
pub use timestamp::Timestamp;
