//! Replication log positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the replicated log.
///
/// Every record carries the index at which it was last modified; age
/// comparisons are made against a cutoff index rather than wall-clock time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LogIndex(u64);

impl LogIndex {
    /// Before anything was written.
    pub const ZERO: LogIndex = LogIndex(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The index following this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Is a record last modified at `self` old enough for `cutoff`?
    pub fn is_at_or_before(self, cutoff: LogIndex) -> bool {
        self <= cutoff
    }
}

impl From<u64> for LogIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for LogIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
