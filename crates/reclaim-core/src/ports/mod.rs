//! Ports - 抽象化レイヤー
//!
//! GC エンジンが依存する外部システムへのインターフェース。
//!
//! - **SnapshotSource / StateSnapshot**: 状態ストア（読み取り専用）
//! - **TimeIndexOracle**: ログ位置 ⇔ 時刻の対応表
//! - **DeleteSink**: 削除トランザクションの書き込み先（レプリケーションログ）
//! - **Clock**: 現在時刻

pub mod clock;
pub mod delete_sink;
pub mod snapshot;
pub mod time_index;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::delete_sink::{DeleteSink, DeleteTransaction, ReapRequest};
pub use self::snapshot::{SnapshotSource, StateSnapshot};
pub use self::time_index::TimeIndexOracle;
