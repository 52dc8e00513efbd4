//! reclaim-core
//!
//! Garbage collection for a replicated cluster scheduler's state: old
//! terminal evaluations and their allocations, down nodes, and dead jobs
//! with their whole evaluation/allocation tree.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, index, state, job, evaluation, allocation, node, request, errors）
//! - **ports**: 抽象化レイヤー（SnapshotSource, TimeIndexOracle, DeleteSink, Clock）
//! - **gc**: GC エンジン（eligibility passes, partitioner, CoreScheduler）
//! - **impls**: 実装（InMemoryStateStore, InMemoryTimeTable など開発用）
//!
//! # 使用例
//! ```ignore
//! let store = InMemoryStateStore::new();
//! let scheduler = CoreSchedulerBuilder::new()
//!     .snapshots(store.clone())
//!     .sink(store.clone())
//!     .oracle(time_table)
//!     .build()?;
//! let summary = scheduler.process(GcRequest::new(GcKind::EvalGc, index)).await?;
//! ```

pub mod domain;
pub mod gc;
pub mod impls;
pub mod ports;
