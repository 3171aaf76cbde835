//! Snapshot versions
//!
//! A `SnapshotVersion` is the logical read time at which a document (or its
//! absence) was observed. It is a (seconds, nanos) pair since Unix epoch and
//! is totally ordered.

use crate::error::{BundleError, BundleResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Read time of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshotVersion")]
pub struct SnapshotVersion {
    seconds: i64,
    nanos: i32,
}

impl SnapshotVersion {
    /// The absent version, sorts before every real version
    pub const NONE: SnapshotVersion = SnapshotVersion {
        seconds: 0,
        nanos: 0,
    };

    /// Create a version from seconds and nanoseconds
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `nanos` is outside `0..1_000_000_000`.
    pub fn new(seconds: i64, nanos: i32) -> BundleResult<Self> {
        if !(0..NANOS_PER_SECOND).contains(&nanos) {
            return Err(BundleError::invalid_input(format!(
                "snapshot version nanos out of range: {}",
                nanos
            )));
        }
        Ok(Self { seconds, nanos })
    }

    /// Create a version at a whole second
    pub const fn from_secs(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Seconds since epoch
    #[inline]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond fraction
    #[inline]
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }
}

/// Unvalidated wire form of a `SnapshotVersion`
#[derive(Deserialize)]
struct RawSnapshotVersion {
    seconds: i64,
    nanos: i32,
}

impl TryFrom<RawSnapshotVersion> for SnapshotVersion {
    type Error = BundleError;

    fn try_from(raw: RawSnapshotVersion) -> Result<Self, Self::Error> {
        SnapshotVersion::new(raw.seconds, raw.nanos)
    }
}

impl Default for SnapshotVersion {
    fn default() -> Self {
        SnapshotVersion::NONE
    }
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        let v1 = SnapshotVersion::new(10, 5).unwrap();
        let v2 = SnapshotVersion::new(10, 6).unwrap();
        let v3 = SnapshotVersion::from_secs(11);

        assert!(SnapshotVersion::NONE < v1);
        assert!(v1 < v2);
        assert!(v2 < v3);
        assert_eq!(v3, SnapshotVersion::new(11, 0).unwrap());
    }

    #[test]
    fn test_nanos_range() {
        assert!(SnapshotVersion::new(1, -1).is_err());
        assert!(SnapshotVersion::new(1, 1_000_000_000).is_err());
        assert!(SnapshotVersion::new(1, 999_999_999).is_ok());
    }

    #[test]
    fn test_deserialize_checks_nanos() {
        let v: SnapshotVersion =
            serde_json::from_value(serde_json::json!({ "seconds": 1, "nanos": 2 })).unwrap();
        assert_eq!(v, SnapshotVersion::new(1, 2).unwrap());

        let too_large = serde_json::from_value::<SnapshotVersion>(
            serde_json::json!({ "seconds": 1, "nanos": 2_000_000_000 }),
        );
        assert!(too_large.is_err());

        let negative = serde_json::from_value::<SnapshotVersion>(
            serde_json::json!({ "seconds": 1, "nanos": -5 }),
        );
        assert!(negative.is_err());
    }

    #[test]
    fn test_display() {
        let v = SnapshotVersion::new(3, 42).unwrap();
        assert_eq!(v.to_string(), "3.000000042");
        assert_eq!(SnapshotVersion::default(), SnapshotVersion::NONE);
    }
}
