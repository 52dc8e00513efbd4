//! Allocation record.

use serde::{Deserialize, Serialize};

use super::evaluation::Evaluation;
use super::ids::{AllocId, EvalId, JobId, NodeId};
use super::index::LogIndex;
use super::state::{ClientStatus, DesiredStatus};

/// Placement of an evaluation's work on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: AllocId,
    pub eval_id: EvalId,
    pub job_id: JobId,
    pub node_id: NodeId,

    /// Set by the scheduler.
    pub desired_status: DesiredStatus,

    /// Reported by the node.
    pub client_status: ClientStatus,

    #[serde(default)]
    pub modify_index: LogIndex,
}

impl Allocation {
    /// New allocation for `eval` on `node_id`, desired to run and not yet
    /// started on the client.
    pub fn new(eval: &Evaluation, node_id: NodeId) -> Self {
        Self {
            id: AllocId::generate(),
            eval_id: eval.id,
            job_id: eval.job_id,
            node_id,
            desired_status: DesiredStatus::Run,
            client_status: ClientStatus::Pending,
            modify_index: LogIndex::ZERO,
        }
    }

    /// The scheduler no longer wants this allocation running.
    ///
    /// Client status is irrelevant here: a stopped allocation whose node
    /// still reports it running is terminal.
    pub fn is_terminal(&self) -> bool {
        self.desired_status != DesiredStatus::Run
    }

    /// Desired to run and reported running by its node.
    ///
    /// A live allocation is never reclaimed, and it pins both its
    /// evaluation and its node.
    pub fn is_live(&self) -> bool {
        self.desired_status == DesiredStatus::Run && self.client_status == ClientStatus::Running
    }
}
