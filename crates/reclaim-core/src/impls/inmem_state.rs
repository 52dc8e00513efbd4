//! InMemoryStateStore - 開発用・テスト用の状態ストア
//!
//! # 実装詳細
//! - `ClusterState` がテーブルと二次インデックスを保持（BTreeMap で順序を安定化）
//! - スナップショットは `ClusterState` のクローン（不変）
//! - DeleteSink として削除トランザクションをロック内でアトミックに適用

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{
    AllocId, Allocation, EvalId, Evaluation, GcError, Job, JobId, LogIndex, Node, NodeId,
    SinkError,
};
use crate::ports::{DeleteSink, DeleteTransaction, SnapshotSource, StateSnapshot};

/// Tables of one cluster state plus the parent indices the collector walks.
///
/// Doubles as the snapshot type: a snapshot is a clone frozen at the time
/// it was taken.
#[derive(Debug, Clone, Default)]
pub struct ClusterState {
    index: LogIndex,

    jobs: BTreeMap<JobId, Job>,
    evals: BTreeMap<EvalId, Evaluation>,
    allocs: BTreeMap<AllocId, Allocation>,
    nodes: BTreeMap<NodeId, Node>,

    evals_by_job: BTreeMap<JobId, BTreeSet<EvalId>>,
    allocs_by_eval: BTreeMap<EvalId, BTreeSet<AllocId>>,
    allocs_by_job: BTreeMap<JobId, BTreeSet<AllocId>>,
    allocs_by_node: BTreeMap<NodeId, BTreeSet<AllocId>>,
}

impl ClusterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest index written.
    pub fn latest_index(&self) -> LogIndex {
        self.index
    }

    fn advance(&mut self, index: LogIndex) {
        self.index = self.index.max(index);
    }

    pub fn upsert_job(&mut self, index: impl Into<LogIndex>, mut job: Job) {
        let index = index.into();
        job.modify_index = index;
        self.jobs.insert(job.id, job);
        self.advance(index);
    }

    pub fn upsert_evals(&mut self, index: impl Into<LogIndex>, evals: Vec<Evaluation>) {
        let index = index.into();
        for mut eval in evals {
            eval.modify_index = index;
            if let Some(old) = self.evals.remove(&eval.id) {
                unlink(&mut self.evals_by_job, old.job_id, &old.id);
            }
            self.evals_by_job
                .entry(eval.job_id)
                .or_default()
                .insert(eval.id);
            self.evals.insert(eval.id, eval);
        }
        self.advance(index);
    }

    pub fn upsert_allocs(&mut self, index: impl Into<LogIndex>, allocs: Vec<Allocation>) {
        let index = index.into();
        for mut alloc in allocs {
            alloc.modify_index = index;
            self.remove_alloc(alloc.id);
            self.allocs_by_eval
                .entry(alloc.eval_id)
                .or_default()
                .insert(alloc.id);
            self.allocs_by_job
                .entry(alloc.job_id)
                .or_default()
                .insert(alloc.id);
            self.allocs_by_node
                .entry(alloc.node_id)
                .or_default()
                .insert(alloc.id);
            self.allocs.insert(alloc.id, alloc);
        }
        self.advance(index);
    }

    pub fn upsert_node(&mut self, index: impl Into<LogIndex>, mut node: Node) {
        let index = index.into();
        node.modify_index = index;
        self.nodes.insert(node.id, node);
        self.advance(index);
    }

    /// Apply a delete transaction at `index`. Unknown keys are ignored so a
    /// replayed transaction is harmless.
    pub fn apply(&mut self, index: LogIndex, txn: &DeleteTransaction) {
        match txn {
            DeleteTransaction::Reap(req) => {
                for &alloc_id in &req.allocs {
                    self.remove_alloc(alloc_id);
                }
                for &eval_id in &req.evals {
                    if let Some(old) = self.evals.remove(&eval_id) {
                        unlink(&mut self.evals_by_job, old.job_id, &old.id);
                    }
                }
            }
            DeleteTransaction::DeregisterJobs { jobs } => {
                for job_id in jobs {
                    self.jobs.remove(job_id);
                }
            }
            DeleteTransaction::DeregisterNodes { nodes } => {
                for node_id in nodes {
                    self.nodes.remove(node_id);
                }
            }
        }
        self.advance(index);
    }

    fn remove_alloc(&mut self, alloc_id: AllocId) {
        if let Some(old) = self.allocs.remove(&alloc_id) {
            unlink(&mut self.allocs_by_eval, old.eval_id, &old.id);
            unlink(&mut self.allocs_by_job, old.job_id, &old.id);
            unlink(&mut self.allocs_by_node, old.node_id, &old.id);
        }
    }
}

fn unlink<K: Ord, V: Ord>(index: &mut BTreeMap<K, BTreeSet<V>>, key: K, value: &V) {
    if let Some(set) = index.get_mut(&key) {
        set.remove(value);
        if set.is_empty() {
            index.remove(&key);
        }
    }
}

impl StateSnapshot for ClusterState {
    fn index(&self) -> LogIndex {
        self.index
    }

    fn job_by_id(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    fn jobs(&self) -> Vec<&Job> {
        self.jobs.values().collect()
    }

    fn eval_by_id(&self, id: EvalId) -> Option<&Evaluation> {
        self.evals.get(&id)
    }

    fn evals(&self) -> Vec<&Evaluation> {
        self.evals.values().collect()
    }

    fn evals_by_job(&self, job_id: JobId) -> Vec<&Evaluation> {
        lookup(&self.evals_by_job, &job_id, &self.evals)
    }

    fn alloc_by_id(&self, id: AllocId) -> Option<&Allocation> {
        self.allocs.get(&id)
    }

    fn allocs_by_eval(&self, eval_id: EvalId) -> Vec<&Allocation> {
        lookup(&self.allocs_by_eval, &eval_id, &self.allocs)
    }

    fn allocs_by_job(&self, job_id: JobId) -> Vec<&Allocation> {
        lookup(&self.allocs_by_job, &job_id, &self.allocs)
    }

    fn allocs_by_node(&self, node_id: NodeId) -> Vec<&Allocation> {
        lookup(&self.allocs_by_node, &node_id, &self.allocs)
    }

    fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn nodes(&self) -> Vec<&Node> {
        self.nodes.values().collect()
    }
}

fn lookup<'a, P: Ord, K: Ord, T>(
    index: &BTreeMap<P, BTreeSet<K>>,
    parent: &P,
    table: &'a BTreeMap<K, T>,
) -> Vec<&'a T> {
    index
        .get(parent)
        .map(|ids| ids.iter().filter_map(|id| table.get(id)).collect())
        .unwrap_or_default()
}

struct StoreInner {
    state: ClusterState,

    /// Remaining transactions the sink accepts before failing (test hook).
    sink_budget: Option<usize>,
}

/// In-memory authoritative store: snapshot source and delete sink in one.
///
/// # 使用例
/// ```ignore
/// let store = Arc::new(InMemoryStateStore::new());
/// store.upsert_node(1000, node).await;
/// let snap = store.snapshot_min_index(LogIndex::new(1000)).await?;
/// ```
#[derive(Clone)]
pub struct InMemoryStateStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::from_state(ClusterState::new())
    }

    pub fn from_state(state: ClusterState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state,
                sink_budget: None,
            })),
        }
    }

    pub async fn latest_index(&self) -> LogIndex {
        self.inner.lock().await.state.latest_index()
    }

    pub async fn upsert_job(&self, index: impl Into<LogIndex>, job: Job) {
        self.inner.lock().await.state.upsert_job(index, job);
    }

    pub async fn upsert_evals(&self, index: impl Into<LogIndex>, evals: Vec<Evaluation>) {
        self.inner.lock().await.state.upsert_evals(index, evals);
    }

    pub async fn upsert_allocs(&self, index: impl Into<LogIndex>, allocs: Vec<Allocation>) {
        self.inner.lock().await.state.upsert_allocs(index, allocs);
    }

    pub async fn upsert_node(&self, index: impl Into<LogIndex>, node: Node) {
        self.inner.lock().await.state.upsert_node(index, node);
    }

    pub async fn job_by_id(&self, id: JobId) -> Option<Job> {
        self.inner.lock().await.state.jobs.get(&id).cloned()
    }

    pub async fn eval_by_id(&self, id: EvalId) -> Option<Evaluation> {
        self.inner.lock().await.state.evals.get(&id).cloned()
    }

    pub async fn alloc_by_id(&self, id: AllocId) -> Option<Allocation> {
        self.inner.lock().await.state.allocs.get(&id).cloned()
    }

    pub async fn node_by_id(&self, id: NodeId) -> Option<Node> {
        self.inner.lock().await.state.nodes.get(&id).cloned()
    }

    /// Make the sink reject every transaction after the next `n`.
    pub async fn fail_after(&self, n: usize) {
        self.inner.lock().await.sink_budget = Some(n);
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotSource for InMemoryStateStore {
    async fn snapshot_min_index(
        &self,
        index: LogIndex,
    ) -> Result<Box<dyn StateSnapshot>, GcError> {
        let inner = self.inner.lock().await;
        let latest = inner.state.latest_index();
        if latest < index {
            return Err(GcError::SnapshotUnavailable {
                requested: index,
                latest,
            });
        }
        Ok(Box::new(inner.state.clone()))
    }
}

#[async_trait]
impl DeleteSink for InMemoryStateStore {
    async fn submit(&self, txn: DeleteTransaction) -> Result<LogIndex, SinkError> {
        let mut inner = self.inner.lock().await;
        if let Some(budget) = inner.sink_budget.as_mut() {
            if *budget == 0 {
                return Err(SinkError::WriteFailed("injected sink failure".to_string()));
            }
            *budget -= 1;
        }

        let index = inner.state.latest_index().next();
        inner.state.apply(index, &txn);
        debug!(%index, records = txn.len(), "applied delete transaction");
        Ok(index)
    }
}
