//! State - ジョブ・評価・割り当て・ノードの状態
//!
//! Status tags as written by the scheduling subsystem and node heartbeats.
//! The collector only reads them.

use serde::{Deserialize, Serialize};

/// Job type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Service,
    Batch,
    System,
}

impl JobType {
    /// Batch work is only ever reclaimed together with its job.
    pub fn is_batch(self) -> bool {
        self == JobType::Batch
    }
}

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Dead,
}

/// Evaluation status.
///
/// State transitions:
/// - Pending -> Running -> Complete
/// - Pending -> Running -> Failed
/// - Pending -> Canceled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalStatus {
    Pending,
    Running,
    Complete,
    Failed,
    Canceled,
}

impl EvalStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EvalStatus::Complete | EvalStatus::Failed | EvalStatus::Canceled
        )
    }
}

/// What the scheduler wants an allocation to be doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredStatus {
    Run,
    Stop,
    Evict,
}

/// What the node reports an allocation is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Pending,
    Running,
    Complete,
    Failed,
}

/// Client node status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Initializing,
    Ready,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pending(EvalStatus::Pending, false)]
    #[case::running(EvalStatus::Running, false)]
    #[case::complete(EvalStatus::Complete, true)]
    #[case::failed(EvalStatus::Failed, true)]
    #[case::canceled(EvalStatus::Canceled, true)]
    fn eval_terminal_states(#[case] status: EvalStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[test]
    fn statuses_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&DesiredStatus::Evict).unwrap();
        assert_eq!(json, "\"evict\"");

        let status: JobType = serde_json::from_str("\"batch\"").unwrap();
        assert!(status.is_batch());
    }
}
