//! BatchId - totally ordered logical time unit
//!
//! A BatchId identifies one discrete unit of logical time and stands for
//! "all events before this identifier". It carries no meaning beyond total
//! order and successor/predecessor arithmetic.
//!
//! The decimal string form matters: legacy version tags store a BatchId as
//! text, and resolution parses it back via `FromStr`.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A totally ordered, discrete logical-time identifier.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BatchId(i64);

impl BatchId {
    /// Creates a BatchId with the given value.
    #[inline]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    ///
    /// Exists for serialization and diagnostics; application code should
    /// not depend on the internal representation.
    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The successor batch.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// The predecessor batch.
    #[inline]
    pub fn prev(&self) -> Self {
        Self(self.0 - 1)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BatchId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(BatchId)
    }
}
