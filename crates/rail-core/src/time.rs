//! Wall-clock time model.
//!
//! The core never reads the system clock for domain logic: every timestamp
//! enters through an ingestion feed and every predicted time is an offset
//! from the snapshot that produced it.  Keeping time as plain Unix seconds
//! makes all offset arithmetic exact and comparisons O(1).

use std::fmt;

/// A Unix timestamp in whole seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    /// The timestamp `secs` seconds after `self`.
    #[inline]
    pub fn offset_secs(self, secs: i64) -> Timestamp {
        Timestamp(self.0 + secs)
    }

    /// The timestamp `mins` minutes after `self`.
    #[inline]
    pub fn offset_mins(self, mins: i64) -> Timestamp {
        Timestamp(self.0 + mins * 60)
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }

    /// Minutes elapsed from `earlier` to `self`, as a fraction.
    #[inline]
    pub fn minutes_since(self, earlier: Timestamp) -> f32 {
        self.since(earlier) as f32 / 60.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
