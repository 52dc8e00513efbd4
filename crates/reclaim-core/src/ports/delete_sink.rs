//! DeleteSink port - 削除トランザクションの書き込み先
//!
//! # 設計原則
//! - 受理されたトランザクションの削除はアトミックに見える
//! - 送信順に適用される（唯一の直列化ポイント）
//! - GC エンジンが状態を消す唯一の経路

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AllocId, EvalId, JobId, LogIndex, NodeId, SinkError};

/// One bounded batch of evaluation and allocation removals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReapRequest {
    pub evals: Vec<EvalId>,
    pub allocs: Vec<AllocId>,
}

impl ReapRequest {
    /// Combined number of identifiers in the batch.
    pub fn len(&self) -> usize {
        self.evals.len() + self.allocs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evals.is_empty() && self.allocs.is_empty()
    }
}

/// A delete transaction submitted to the replicated log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeleteTransaction {
    Reap(ReapRequest),
    DeregisterJobs { jobs: Vec<JobId> },
    DeregisterNodes { nodes: Vec<NodeId> },
}

impl DeleteTransaction {
    /// Number of records the transaction removes.
    pub fn len(&self) -> usize {
        match self {
            DeleteTransaction::Reap(req) => req.len(),
            DeleteTransaction::DeregisterJobs { jobs } => jobs.len(),
            DeleteTransaction::DeregisterNodes { nodes } => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
pub trait DeleteSink: Send + Sync {
    /// Durably apply `txn`, returning the log index it was committed at.
    async fn submit(&self, txn: DeleteTransaction) -> Result<LogIndex, SinkError>;
}
