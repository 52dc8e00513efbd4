//! Impls - 実装（開発用・テスト用）
//!
//! ports の in-memory 実装。
//!
//! - **InMemoryStateStore**: SnapshotSource + DeleteSink
//! - **InMemoryTimeTable**: TimeIndexOracle
//!
//! 本番用の実装（レプリケーションログ、永続ストア）は別クレートに配置します。

pub mod inmem_state;
pub mod time_table;

pub use self::inmem_state::{ClusterState, InMemoryStateStore};
pub use self::time_table::InMemoryTimeTable;
