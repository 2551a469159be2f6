//! Version - storage-assigned snapshot identity
//!
//! A version number is assigned by the storage layer to one committed
//! snapshot of a logical path. Versions are totally ordered and unique per
//! path; they carry no other meaning.
//!
//! This is a PURE TYPE with no behavior beyond construction and access.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A monotonically increasing snapshot version, unique per logical path.
///
/// Created exactly once at write time, immutable thereafter. Eviction by
/// retention policy makes a version disappear from listings; the number is
/// never reused.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Creates a Version with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_copy_and_ordered() {
        let a = Version::new(10);
        let b = a;
        assert_eq!(a, b);
        assert!(Version::new(10) < Version::new(20));
    }

    #[test]
    fn test_version_is_hashable() {
        use std::collections::BTreeSet;

        let mut set = BTreeSet::new();
        set.insert(Version::new(1));
        set.insert(Version::new(2));
        set.insert(Version::new(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(300).to_string(), "v300");
    }
}
