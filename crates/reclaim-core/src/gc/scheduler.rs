//! CoreScheduler - GC 実行エンジン
//!
//! One request in, zero or more delete transactions out:
//!
//! 1. Take a snapshot at least as new as the request's reference index.
//! 2. Turn the kind's age threshold into a cutoff index via the time table
//!    (or use the reference index itself for a forced run).
//! 3. Run the eligibility pass(es) against the snapshot.
//! 4. Partition the removal set and submit the transactions one at a time.
//!
//! The first rejected transaction aborts the run; the error goes to the
//! caller, which decides whether to retry. Batches already accepted stay
//! applied and a retry will simply not find them again.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{GcError, GcKind, GcRequest, LogIndex};
use crate::ports::{Clock, DeleteSink, SnapshotSource, StateSnapshot, TimeIndexOracle};

use super::candidates::GcCandidates;
use super::config::GcConfig;
use super::eval_gc::eval_candidates;
use super::job_gc::job_candidates;
use super::node_gc::node_candidates;
use super::partition::build_transactions;
use super::pass::GcPass;
use super::summary::{GcPlan, GcSummary};

pub struct CoreScheduler {
    config: GcConfig,
    snapshots: Arc<dyn SnapshotSource>,
    oracle: Arc<dyn TimeIndexOracle>,
    sink: Arc<dyn DeleteSink>,
    clock: Arc<dyn Clock>,
}

impl CoreScheduler {
    /// Use `CoreSchedulerBuilder` unless every port is already at hand.
    pub fn new(
        config: GcConfig,
        snapshots: Arc<dyn SnapshotSource>,
        oracle: Arc<dyn TimeIndexOracle>,
        sink: Arc<dyn DeleteSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            snapshots,
            oracle,
            sink,
            clock,
        }
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Compute what `process` would submit, without submitting it.
    pub async fn plan(&self, request: GcRequest) -> Result<GcPlan, GcError> {
        let snap = self
            .snapshots
            .snapshot_min_index(request.reference_index)
            .await?;

        let pass = self.pass_for(request)?;
        let candidates = collect(snap.as_ref(), request.kind, pass);
        let transactions = build_transactions(&candidates, self.config.max_ids_per_reap);

        debug!(
            kind = %request.kind,
            snapshot_index = %snap.index(),
            cutoff = %pass.cutoff,
            candidates = candidates.len(),
            "gc plan computed"
        );

        Ok(GcPlan {
            request,
            cutoff: pass.cutoff,
            candidates,
            transactions,
        })
    }

    /// Run one collection request to completion.
    pub async fn process(&self, request: GcRequest) -> Result<GcSummary, GcError> {
        let plan = self.plan(request).await?;
        let summary = GcSummary::from_plan(&plan);

        if plan.is_empty() {
            info!(
                kind = %request.kind,
                reference_index = %request.reference_index,
                cutoff = %plan.cutoff,
                "gc found nothing to reclaim"
            );
            return Ok(summary);
        }

        let total = plan.transactions.len();
        for (i, txn) in plan.transactions.into_iter().enumerate() {
            let batch = i + 1;
            let size = txn.len();
            match self.sink.submit(txn).await {
                Ok(committed) => {
                    debug!(kind = %request.kind, batch, total, size, %committed, "delete transaction committed");
                }
                Err(source) => {
                    warn!(
                        kind = %request.kind,
                        batch,
                        total,
                        unsent = total - batch,
                        error = %source,
                        "delete transaction rejected, aborting gc run"
                    );
                    return Err(GcError::SinkSubmission {
                        batch,
                        total,
                        source,
                    });
                }
            }
        }

        info!(
            kind = %summary.kind,
            reference_index = %summary.reference_index,
            cutoff = %summary.cutoff,
            evals = summary.evals,
            allocs = summary.allocs,
            nodes = summary.nodes,
            jobs = summary.jobs,
            transactions = summary.transactions,
            "gc run complete"
        );
        Ok(summary)
    }

    fn pass_for(&self, request: GcRequest) -> Result<GcPass, GcError> {
        let Some(threshold) = self.config.threshold_for(request.kind)? else {
            return Ok(GcPass::forced(request.reference_index));
        };

        let threshold_cutoff = match self.clock.now().checked_sub_signed(threshold) {
            Some(at) => self.oracle.position_at_or_before(at)?,
            None => LogIndex::ZERO,
        };
        Ok(GcPass::aged(threshold_cutoff.min(request.reference_index)))
    }
}

fn collect(snap: &dyn StateSnapshot, kind: GcKind, pass: GcPass) -> GcCandidates {
    match kind {
        GcKind::EvalGc => eval_candidates(snap, pass),
        GcKind::NodeGc => node_candidates(snap, pass),
        GcKind::JobGc => job_candidates(snap, pass),
        GcKind::ForceGc => {
            let mut all = eval_candidates(snap, pass);
            all.merge(node_candidates(snap, pass));
            all.merge(job_candidates(snap, pass));
            all
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Allocation, ClientStatus, DesiredStatus, EvalStatus, Evaluation, Job, JobStatus,
        JobType, Node, NodeStatus,
    };
    use crate::gc::CoreSchedulerBuilder;
    use crate::impls::{InMemoryStateStore, InMemoryTimeTable};
    use crate::ports::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Index 2000 was committed long enough ago for every pass.
    fn old_table() -> InMemoryTimeTable {
        let table = InMemoryTimeTable::new(Duration::zero(), Duration::days(7));
        table.witness(2000, now() - Duration::days(2));
        table
    }

    fn scheduler(store: &InMemoryStateStore, config: GcConfig) -> CoreScheduler {
        CoreSchedulerBuilder::new()
            .config(config)
            .snapshots(store.clone())
            .sink(store.clone())
            .oracle(old_table())
            .clock(Arc::new(FixedClock::new(now())))
            .build()
            .unwrap()
    }

    async fn failed_service_evals(store: &InMemoryStateStore, n: usize) -> Vec<Evaluation> {
        let evals: Vec<_> = (0..n)
            .map(|_| {
                let mut eval = Evaluation::new(crate::domain::JobId::generate(), JobType::Service);
                eval.status = EvalStatus::Failed;
                eval
            })
            .collect();
        store.upsert_evals(1000, evals.clone()).await;
        evals
    }

    #[tokio::test]
    async fn eval_gc_removes_old_failed_evals() {
        let store = InMemoryStateStore::new();
        let evals = failed_service_evals(&store, 1).await;
        let mut alloc = Allocation::new(&evals[0], crate::domain::NodeId::generate());
        alloc.desired_status = DesiredStatus::Stop;
        store.upsert_allocs(1001, vec![alloc.clone()]).await;

        let sched = scheduler(&store, GcConfig::default());
        let summary = sched
            .process(GcRequest::new(GcKind::EvalGc, 1001))
            .await
            .unwrap();

        assert_eq!(summary.evals, 1);
        assert_eq!(summary.allocs, 1);
        assert_eq!(summary.transactions, 1);
        assert!(store.eval_by_id(evals[0].id).await.is_none());
        assert!(store.alloc_by_id(alloc.id).await.is_none());
    }

    #[tokio::test]
    async fn cutoff_is_clamped_to_reference_index() {
        let store = InMemoryStateStore::new();
        failed_service_evals(&store, 1).await;

        let sched = scheduler(&store, GcConfig::default());
        let plan = sched
            .plan(GcRequest::new(GcKind::EvalGc, 500))
            .await
            .unwrap();

        assert_eq!(plan.cutoff, LogIndex::new(500));
        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn young_records_are_kept_by_aged_runs() {
        let store = InMemoryStateStore::new();
        let evals = failed_service_evals(&store, 1).await;

        let table = InMemoryTimeTable::new(Duration::zero(), Duration::days(7));
        table.witness(2000, now() - Duration::minutes(5));
        let sched = CoreSchedulerBuilder::new()
            .snapshots(store.clone())
            .sink(store.clone())
            .oracle(table)
            .clock(Arc::new(FixedClock::new(now())))
            .build()
            .unwrap();

        let summary = sched
            .process(GcRequest::new(GcKind::EvalGc, 1000))
            .await
            .unwrap();

        assert_eq!(summary.cutoff, LogIndex::ZERO);
        assert_eq!(summary.reclaimed(), 0);
        assert!(store.eval_by_id(evals[0].id).await.is_some());
    }

    #[tokio::test]
    async fn plan_does_not_touch_the_store() {
        let store = InMemoryStateStore::new();
        let evals = failed_service_evals(&store, 3).await;

        let sched = scheduler(&store, GcConfig::default());
        let plan = sched
            .plan(GcRequest::new(GcKind::EvalGc, 1000))
            .await
            .unwrap();

        assert_eq!(plan.candidates.evals.len(), 3);
        for eval in evals {
            assert!(store.eval_by_id(eval.id).await.is_some());
        }
    }

    #[tokio::test]
    async fn snapshot_ahead_of_store_is_transient() {
        let store = InMemoryStateStore::new();
        failed_service_evals(&store, 1).await;

        let sched = scheduler(&store, GcConfig::default());
        let err = sched
            .process(GcRequest::new(GcKind::EvalGc, 5000))
            .await
            .unwrap_err();

        assert!(matches!(err, GcError::SnapshotUnavailable { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn sink_failure_stops_remaining_batches() {
        let store = InMemoryStateStore::new();
        let evals = failed_service_evals(&store, 5).await;
        store.fail_after(1).await;

        let sched = scheduler(
            &store,
            GcConfig {
                max_ids_per_reap: 2,
                ..GcConfig::default()
            },
        );
        let err = sched
            .process(GcRequest::new(GcKind::EvalGc, 1000))
            .await
            .unwrap_err();

        match err {
            GcError::SinkSubmission { batch, total, .. } => {
                assert_eq!(batch, 2);
                assert_eq!(total, 3);
            }
            other => panic!("Expected SinkSubmission, got {other:?}"),
        }

        let mut remaining = 0;
        for eval in &evals {
            if store.eval_by_id(eval.id).await.is_some() {
                remaining += 1;
            }
        }
        assert_eq!(remaining, 3);
    }

    #[tokio::test]
    async fn second_run_finds_nothing() {
        let store = InMemoryStateStore::new();
        failed_service_evals(&store, 4).await;

        let sched = scheduler(&store, GcConfig::default());
        let first = sched
            .process(GcRequest::new(GcKind::EvalGc, 1000))
            .await
            .unwrap();
        let latest = store.latest_index().await;
        let second = sched
            .process(GcRequest::new(GcKind::EvalGc, latest))
            .await
            .unwrap();

        assert_eq!(first.evals, 4);
        assert_eq!(second.reclaimed(), 0);
        assert_eq!(second.transactions, 0);
    }

    #[tokio::test]
    async fn forced_run_covers_all_three_passes() {
        let store = InMemoryStateStore::new();

        let mut job = Job::new(JobType::Batch);
        job.status = JobStatus::Dead;
        let mut job_eval = Evaluation::new(job.id, JobType::Batch);
        job_eval.status = EvalStatus::Complete;
        let mut job_alloc = Allocation::new(&job_eval, crate::domain::NodeId::generate());
        job_alloc.desired_status = DesiredStatus::Stop;
        job_alloc.client_status = ClientStatus::Complete;
        let node = Node::new(NodeStatus::Down);

        store.upsert_job(3000, job.clone()).await;
        store.upsert_evals(3001, vec![job_eval.clone()]).await;
        store.upsert_allocs(3002, vec![job_alloc.clone()]).await;
        store.upsert_node(3003, node.clone()).await;
        let service = failed_service_evals(&store, 1).await;

        let sched = scheduler(&store, GcConfig::default());
        let summary = sched
            .process(GcRequest::new(GcKind::ForceGc, 3003))
            .await
            .unwrap();

        assert_eq!(summary.cutoff, LogIndex::new(3003));
        assert_eq!(summary.jobs, 1);
        assert_eq!(summary.nodes, 1);
        assert_eq!(summary.evals, 2);
        assert_eq!(summary.allocs, 1);
        assert!(store.job_by_id(job.id).await.is_none());
        assert!(store.node_by_id(node.id).await.is_none());
        assert!(store.eval_by_id(service[0].id).await.is_none());
        assert!(store.alloc_by_id(job_alloc.id).await.is_none());
    }

    #[tokio::test]
    async fn forced_run_deduplicates_overlapping_passes() {
        let store = InMemoryStateStore::new();

        let mut job = Job::new(JobType::Service);
        job.status = JobStatus::Dead;
        let mut eval = Evaluation::new(job.id, JobType::Service);
        eval.status = EvalStatus::Complete;
        store.upsert_job(1000, job).await;
        store.upsert_evals(1001, vec![eval]).await;

        let sched = scheduler(&store, GcConfig::default());
        let plan = sched
            .plan(GcRequest::new(GcKind::ForceGc, 1001))
            .await
            .unwrap();

        assert_eq!(plan.candidates.evals.len(), 1);
        assert_eq!(plan.candidates.jobs.len(), 1);
        assert!(matches!(
            plan.transactions.last(),
            Some(crate::ports::DeleteTransaction::DeregisterJobs { .. })
        ));
    }
}
