//! Node eligibility.

use tracing::debug;

use crate::ports::StateSnapshot;

use super::candidates::GcCandidates;
use super::pass::GcPass;

/// Down nodes that are old enough and host no live allocation.
///
/// Force skips the age test only; a node with running work is kept even
/// then. Allocations are never part of the output.
pub fn node_candidates(snap: &dyn StateSnapshot, pass: GcPass) -> GcCandidates {
    let mut out = GcCandidates::default();

    for node in snap.nodes() {
        if !node.is_down() || !pass.is_old_enough(node.modify_index) {
            continue;
        }

        if let Some(live) = snap
            .allocs_by_node(node.id)
            .into_iter()
            .find(|alloc| alloc.is_live())
        {
            debug!(node = %node.id, alloc = %live.id, "down node still hosts a running allocation");
            continue;
        }

        out.nodes.push(node.id);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Allocation, ClientStatus, DesiredStatus, Evaluation, JobId, JobType, LogIndex, Node,
        NodeStatus,
    };
    use crate::impls::ClusterState;
    use rstest::rstest;

    fn alloc_on(node: &Node, desired: DesiredStatus, client: ClientStatus) -> Allocation {
        let eval = Evaluation::new(JobId::generate(), JobType::Service);
        let mut alloc = Allocation::new(&eval, node.id);
        alloc.desired_status = desired;
        alloc.client_status = client;
        alloc
    }

    #[test]
    fn down_node_without_allocs_is_reaped() {
        let mut state = ClusterState::new();
        let node = Node::new(NodeStatus::Down);
        state.upsert_node(1000, node.clone());

        let out = node_candidates(&state, GcPass::aged(LogIndex::new(2000)));

        assert_eq!(out.nodes, vec![node.id]);
        assert!(out.allocs.is_empty());
    }

    #[rstest]
    #[case::initializing(NodeStatus::Initializing)]
    #[case::ready(NodeStatus::Ready)]
    fn healthy_nodes_are_kept(#[case] status: NodeStatus) {
        let mut state = ClusterState::new();
        state.upsert_node(1000, Node::new(status));

        assert!(node_candidates(&state, GcPass::forced(LogIndex::new(1000))).is_empty());
    }

    #[rstest]
    #[case::stopped(DesiredStatus::Stop, ClientStatus::Running, true)]
    #[case::evicted(DesiredStatus::Evict, ClientStatus::Complete, true)]
    #[case::run_pending(DesiredStatus::Run, ClientStatus::Pending, true)]
    #[case::running(DesiredStatus::Run, ClientStatus::Running, false)]
    fn allocs_on_down_node(
        #[case] desired: DesiredStatus,
        #[case] client: ClientStatus,
        #[case] reaped: bool,
    ) {
        let mut state = ClusterState::new();
        let node = Node::new(NodeStatus::Down);
        state.upsert_allocs(1001, vec![alloc_on(&node, desired, client)]);
        state.upsert_node(1000, node);

        let aged = node_candidates(&state, GcPass::aged(LogIndex::new(2000)));
        let forced = node_candidates(&state, GcPass::forced(LogIndex::new(1001)));

        assert_eq!(!aged.nodes.is_empty(), reaped);
        assert_eq!(!forced.nodes.is_empty(), reaped);
    }

    #[test]
    fn young_node_is_kept_unless_forced() {
        let mut state = ClusterState::new();
        let node = Node::new(NodeStatus::Down);
        state.upsert_node(2500, node.clone());

        assert!(node_candidates(&state, GcPass::aged(LogIndex::new(2000))).is_empty());
        assert_eq!(
            node_candidates(&state, GcPass::forced(LogIndex::new(2500))).nodes,
            vec![node.id]
        );
    }
}
