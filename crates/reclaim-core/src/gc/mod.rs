//! GC engine - 削除対象の判定と送信
//!
//! - pass / candidates: 年齢フィルタと削除対象集合
//! - eval_gc / node_gc / job_gc: 適格性の判定（純粋関数）
//! - partition: 削除トランザクションへの分割
//! - config / builder / scheduler / summary: 実行エンジン

pub mod builder;
pub mod candidates;
pub mod config;
pub mod eval_gc;
pub mod job_gc;
pub mod node_gc;
pub mod partition;
pub mod pass;
pub mod scheduler;
pub mod summary;

pub use builder::{BuildError, CoreSchedulerBuilder};
pub use candidates::GcCandidates;
pub use config::{ConfigError, GcConfig, DEFAULT_MAX_IDS_PER_REAP};
pub use eval_gc::eval_candidates;
pub use job_gc::job_candidates;
pub use node_gc::node_candidates;
pub use partition::{build_transactions, partition_reap};
pub use pass::GcPass;
pub use scheduler::CoreScheduler;
pub use summary::{GcPlan, GcSummary};
