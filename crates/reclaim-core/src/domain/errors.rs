//! Errors - エラー型と分類
//!
//! A run either completes or fails with one of these. The core never
//! retries; `ErrorKind` tells the external trigger how to react.

use thiserror::Error;

use super::index::LogIndex;

/// ErrorKind は実行エラーの分類
///
/// - Transient: 一時的なエラー（次回の実行で再試行）
/// - Permanent: 恒久的なエラー（設定の修正が必要）
/// - Infrastructure: インフラエラー（状態ストア・ログの障害）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

/// Failure reported by a delete sink for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The log refused the transaction (e.g. not the leader, too large).
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// The write could not be made durable.
    #[error("durable write failed: {0}")]
    WriteFailed(String),
}

#[derive(Debug, Error)]
pub enum GcError {
    /// The store cannot serve a snapshot at the requested index yet.
    #[error("snapshot at index {requested} unavailable (latest index is {latest})")]
    SnapshotUnavailable {
        requested: LogIndex,
        latest: LogIndex,
    },

    /// The age threshold could not be translated into a cutoff index.
    #[error("time table lookup failed: {0}")]
    OracleLookup(String),

    /// A delete transaction was rejected; later batches were not sent.
    #[error("delete transaction {batch}/{total} rejected: {source}")]
    SinkSubmission {
        batch: usize,
        total: usize,
        #[source]
        source: SinkError,
    },

    #[error("invalid gc configuration: {0}")]
    Config(String),
}

impl GcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GcError::SnapshotUnavailable { .. } => ErrorKind::Transient,
            GcError::OracleLookup(_) | GcError::SinkSubmission { .. } => {
                ErrorKind::Infrastructure
            }
            GcError::Config(_) => ErrorKind::Permanent,
        }
    }

    /// Re-running the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() != ErrorKind::Permanent
    }
}
