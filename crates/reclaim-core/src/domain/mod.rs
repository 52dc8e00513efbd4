//! Domain model: identifiers, log positions, cluster records, requests.
//!
//! - ids / index: 型付き ID とログ位置
//! - state: ステータス enum
//! - job / evaluation / allocation / node: クラスタ状態のレコード
//! - request: GC リクエスト
//! - errors: エラー型

pub mod allocation;
pub mod errors;
pub mod evaluation;
pub mod ids;
pub mod index;
pub mod job;
pub mod node;
pub mod request;
pub mod state;

pub use allocation::Allocation;
pub use errors::{ErrorKind, GcError, SinkError};
pub use evaluation::Evaluation;
pub use ids::{AllocId, EvalId, JobId, NodeId};
pub use index::LogIndex;
pub use job::Job;
pub use node::Node;
pub use request::{GcKind, GcRequest};
pub use state::{ClientStatus, DesiredStatus, EvalStatus, JobStatus, JobType, NodeStatus};
