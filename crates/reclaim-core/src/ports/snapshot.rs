//! Snapshot ports - 状態ストアの読み取り専用ビュー
//!
//! `SnapshotSource` は状態ストア（正本）が実装し、
//! `StateSnapshot` はある時点の不変なビューを表します。

use async_trait::async_trait;

use crate::domain::{
    AllocId, Allocation, EvalId, Evaluation, GcError, Job, JobId, JobStatus, LogIndex, Node,
    NodeId,
};

/// Immutable point-in-time view of cluster state.
///
/// All reads reflect the state as of `index()` and never change for the
/// lifetime of the snapshot, so a collection run can walk it without locks.
/// Iteration order must be stable across calls.
pub trait StateSnapshot: Send + Sync {
    /// Index this snapshot reflects.
    fn index(&self) -> LogIndex;

    fn job_by_id(&self, id: JobId) -> Option<&Job>;
    fn jobs(&self) -> Vec<&Job>;

    fn jobs_by_status(&self, status: JobStatus) -> Vec<&Job> {
        self.jobs()
            .into_iter()
            .filter(|job| job.status == status)
            .collect()
    }

    fn eval_by_id(&self, id: EvalId) -> Option<&Evaluation>;
    fn evals(&self) -> Vec<&Evaluation>;
    fn evals_by_job(&self, job_id: JobId) -> Vec<&Evaluation>;

    fn alloc_by_id(&self, id: AllocId) -> Option<&Allocation>;
    fn allocs_by_eval(&self, eval_id: EvalId) -> Vec<&Allocation>;
    fn allocs_by_job(&self, job_id: JobId) -> Vec<&Allocation>;
    fn allocs_by_node(&self, node_id: NodeId) -> Vec<&Allocation>;

    fn node_by_id(&self, id: NodeId) -> Option<&Node>;
    fn nodes(&self) -> Vec<&Node>;
}

/// Hands out snapshots of the authoritative state.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Snapshot reflecting at least `index`.
    ///
    /// Fails with `GcError::SnapshotUnavailable` when the store has not yet
    /// applied `index`.
    async fn snapshot_min_index(&self, index: LogIndex)
    -> Result<Box<dyn StateSnapshot>, GcError>;
}
