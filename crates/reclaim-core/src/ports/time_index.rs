//! TimeIndexOracle port - ログ位置と時刻の対応表
//!
//! The replication layer witnesses `(index, time)` pairs as it commits; the
//! collector asks the reverse question to turn an age threshold into a
//! cutoff index.

use chrono::{DateTime, Utc};

use crate::domain::{GcError, LogIndex};

pub trait TimeIndexOracle: Send + Sync {
    /// Newest log index known to have been committed at or before `at`.
    ///
    /// Implementations must not round forward: when in doubt, answer with an
    /// older index (ultimately `LogIndex::ZERO`) so nothing is reclaimed
    /// early.
    fn position_at_or_before(&self, at: DateTime<Utc>) -> Result<LogIndex, GcError>;
}
