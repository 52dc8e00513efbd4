//! Client node record.

use serde::{Deserialize, Serialize};

use super::ids::NodeId;
use super::index::LogIndex;
use super::state::NodeStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub status: NodeStatus,

    #[serde(default)]
    pub modify_index: LogIndex,
}

impl Node {
    pub fn new(status: NodeStatus) -> Self {
        Self {
            id: NodeId::generate(),
            status,
            modify_index: LogIndex::ZERO,
        }
    }

    pub fn is_down(&self) -> bool {
        self.status == NodeStatus::Down
    }
}
