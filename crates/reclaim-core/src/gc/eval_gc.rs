//! Evaluation eligibility.
//!
//! Batch evaluations are skipped entirely: a batch run's evaluations and
//! allocations are the record of its outcome and go away only with their
//! job (see `job_gc`).

use tracing::debug;

use crate::ports::StateSnapshot;

use super::candidates::GcCandidates;
use super::pass::GcPass;

/// Non-batch evaluations that are terminal, old enough and have no live
/// allocation, together with all of their allocations.
///
/// One live allocation protects its own evaluation and every sibling
/// allocation under it, but nothing under other evaluations.
pub fn eval_candidates(snap: &dyn StateSnapshot, pass: GcPass) -> GcCandidates {
    let mut out = GcCandidates::default();

    for eval in snap.evals() {
        if eval.is_batch() || !eval.is_terminal() || !pass.is_old_enough(eval.modify_index) {
            continue;
        }

        let allocs = snap.allocs_by_eval(eval.id);
        if let Some(live) = allocs.iter().find(|alloc| alloc.is_live()) {
            debug!(eval = %eval.id, alloc = %live.id, "evaluation pinned by running allocation");
            continue;
        }

        out.evals.push(eval.id);
        out.allocs.extend(allocs.iter().map(|alloc| alloc.id));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Allocation, ClientStatus, DesiredStatus, EvalStatus, Evaluation, JobId, JobType,
        LogIndex, NodeId,
    };
    use crate::impls::ClusterState;
    use rstest::rstest;

    fn eval(job_type: JobType, status: EvalStatus) -> Evaluation {
        let mut eval = Evaluation::new(JobId::generate(), job_type);
        eval.status = status;
        eval
    }

    fn alloc(eval: &Evaluation, desired: DesiredStatus, client: ClientStatus) -> Allocation {
        let mut alloc = Allocation::new(eval, NodeId::generate());
        alloc.desired_status = desired;
        alloc.client_status = client;
        alloc
    }

    #[test]
    fn terminal_eval_with_terminal_alloc_is_reaped() {
        let mut state = ClusterState::new();
        let e = eval(JobType::Service, EvalStatus::Failed);
        let a = alloc(&e, DesiredStatus::Stop, ClientStatus::Failed);
        state.upsert_evals(1000, vec![e.clone()]);
        state.upsert_allocs(1001, vec![a.clone()]);

        let out = eval_candidates(&state, GcPass::aged(LogIndex::new(2000)));

        assert_eq!(out.evals, vec![e.id]);
        assert_eq!(out.allocs, vec![a.id]);
    }

    #[test]
    fn running_alloc_protects_eval_and_siblings() {
        let mut state = ClusterState::new();
        let e = eval(JobType::Service, EvalStatus::Complete);
        let dead = alloc(&e, DesiredStatus::Stop, ClientStatus::Complete);
        let running = alloc(&e, DesiredStatus::Run, ClientStatus::Running);
        state.upsert_evals(1000, vec![e]);
        state.upsert_allocs(1001, vec![dead, running]);

        let out = eval_candidates(&state, GcPass::aged(LogIndex::new(2000)));

        assert!(out.is_empty());
    }

    #[test]
    fn running_alloc_does_not_protect_other_evals() {
        let mut state = ClusterState::new();
        let pinned = eval(JobType::Service, EvalStatus::Complete);
        let free = eval(JobType::Service, EvalStatus::Complete);
        state.upsert_evals(1000, vec![pinned.clone(), free.clone()]);
        state.upsert_allocs(
            1001,
            vec![alloc(&pinned, DesiredStatus::Run, ClientStatus::Running)],
        );

        let out = eval_candidates(&state, GcPass::aged(LogIndex::new(2000)));

        assert_eq!(out.evals, vec![free.id]);
    }

    #[test]
    fn desired_run_but_not_running_does_not_pin() {
        let mut state = ClusterState::new();
        let e = eval(JobType::System, EvalStatus::Complete);
        let a = alloc(&e, DesiredStatus::Run, ClientStatus::Pending);
        state.upsert_evals(1000, vec![e.clone()]);
        state.upsert_allocs(1001, vec![a.clone()]);

        let out = eval_candidates(&state, GcPass::aged(LogIndex::new(2000)));

        assert_eq!(out.evals, vec![e.id]);
        assert_eq!(out.allocs, vec![a.id]);
    }

    #[rstest]
    #[case::complete(EvalStatus::Complete)]
    #[case::failed(EvalStatus::Failed)]
    fn batch_evals_are_never_reaped(#[case] status: EvalStatus) {
        let mut state = ClusterState::new();
        let e = eval(JobType::Batch, status);
        state.upsert_evals(1000, vec![e.clone()]);
        state.upsert_allocs(1001, vec![alloc(&e, DesiredStatus::Stop, ClientStatus::Failed)]);

        assert!(eval_candidates(&state, GcPass::aged(LogIndex::new(2000))).is_empty());
        assert!(eval_candidates(&state, GcPass::forced(LogIndex::new(1001))).is_empty());
    }

    #[rstest]
    #[case::pending(EvalStatus::Pending)]
    #[case::running(EvalStatus::Running)]
    fn non_terminal_evals_are_kept(#[case] status: EvalStatus) {
        let mut state = ClusterState::new();
        state.upsert_evals(1000, vec![eval(JobType::Service, status)]);

        assert!(eval_candidates(&state, GcPass::forced(LogIndex::new(1000))).is_empty());
    }

    #[test]
    fn young_eval_is_kept_unless_forced() {
        let mut state = ClusterState::new();
        let e = eval(JobType::Service, EvalStatus::Failed);
        state.upsert_evals(3000, vec![e.clone()]);

        assert!(eval_candidates(&state, GcPass::aged(LogIndex::new(2000))).is_empty());

        let forced = eval_candidates(&state, GcPass::forced(LogIndex::new(3000)));
        assert_eq!(forced.evals, vec![e.id]);
    }
}
