//! InMemoryTimeTable - ログ位置と時刻の対応表
//!
//! The replication layer calls `witness` as entries commit. Points closer
//! together than `granularity` are not recorded and points older than
//! `limit` are dropped, so the table stays small no matter how busy the log
//! is. Lookups round *down* to the nearest recorded point, which can only
//! make records look younger than they are.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::domain::{GcError, LogIndex};
use crate::ports::TimeIndexOracle;

#[derive(Debug)]
pub struct InMemoryTimeTable {
    granularity: Duration,
    limit: Duration,

    /// Newest first.
    table: RwLock<VecDeque<(LogIndex, DateTime<Utc>)>>,
}

impl InMemoryTimeTable {
    pub fn new(granularity: Duration, limit: Duration) -> Self {
        Self {
            granularity,
            limit,
            table: RwLock::new(VecDeque::new()),
        }
    }

    /// Record that `index` was committed at `when`.
    pub fn witness(&self, index: impl Into<LogIndex>, when: DateTime<Utc>) {
        let index = index.into();
        let mut table = self.table.write();

        if let Some(&(_, newest)) = table.front()
            && when - newest < self.granularity
        {
            return;
        }
        table.push_front((index, when));

        if let Some(horizon) = when.checked_sub_signed(self.limit) {
            while table.back().is_some_and(|&(_, at)| at < horizon) {
                table.pop_back();
            }
        }
    }

    /// Time of the newest recorded point at or before `index`.
    pub fn nearest_time(&self, index: LogIndex) -> Option<DateTime<Utc>> {
        self.table
            .read()
            .iter()
            .find(|&&(witnessed, _)| witnessed <= index)
            .map(|&(_, at)| at)
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}

impl Default for InMemoryTimeTable {
    /// 5 minute granularity, 72 hours of history.
    fn default() -> Self {
        Self::new(Duration::minutes(5), Duration::hours(72))
    }
}

impl TimeIndexOracle for InMemoryTimeTable {
    fn position_at_or_before(&self, at: DateTime<Utc>) -> Result<LogIndex, GcError> {
        Ok(self
            .table
            .read()
            .iter()
            .find(|&&(_, witnessed)| witnessed <= at)
            .map(|&(index, _)| index)
            .unwrap_or(LogIndex::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn lookup_rounds_down_to_witnessed_point() {
        let table = InMemoryTimeTable::new(Duration::zero(), Duration::hours(1));
        table.witness(10, t0());
        table.witness(20, t0() + Duration::minutes(10));

        let at = |mins| table.position_at_or_before(t0() + Duration::minutes(mins)).unwrap();
        assert_eq!(at(0), LogIndex::new(10));
        assert_eq!(at(9), LogIndex::new(10));
        assert_eq!(at(10), LogIndex::new(20));
        assert_eq!(at(30), LogIndex::new(20));
    }

    #[test]
    fn lookup_before_first_point_is_zero() {
        let table = InMemoryTimeTable::default();
        table.witness(10, t0());

        let index = table
            .position_at_or_before(t0() - Duration::seconds(1))
            .unwrap();
        assert_eq!(index, LogIndex::ZERO);
    }

    #[test]
    fn witness_respects_granularity() {
        let table = InMemoryTimeTable::new(Duration::minutes(5), Duration::hours(1));
        table.witness(10, t0());
        table.witness(11, t0() + Duration::minutes(1));
        table.witness(12, t0() + Duration::minutes(5));

        assert_eq!(table.len(), 2);
        assert_eq!(table.nearest_time(LogIndex::new(11)), Some(t0()));
    }

    #[test]
    fn witness_drops_points_past_the_limit() {
        let table = InMemoryTimeTable::new(Duration::zero(), Duration::hours(1));
        table.witness(10, t0());
        table.witness(20, t0() + Duration::minutes(30));
        table.witness(30, t0() + Duration::minutes(90));

        assert_eq!(table.len(), 2);
        assert_eq!(table.nearest_time(LogIndex::new(15)), None);
    }
}
