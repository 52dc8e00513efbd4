//! CoreSchedulerBuilder - スケジューラの構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//!
//! Every port except the clock must be supplied; `build()` reports the
//! missing ones all at once and validates the configuration.

use std::sync::Arc;

use crate::domain::GcError;
use crate::ports::{Clock, DeleteSink, SnapshotSource, SystemClock, TimeIndexOracle};

use super::config::GcConfig;
use super::scheduler::CoreScheduler;

/// # 使用例
/// ```ignore
/// let scheduler = CoreSchedulerBuilder::new()
///     .snapshots(store.clone())
///     .sink(store)
///     .oracle(time_table)
///     .build()?;
/// ```
#[derive(Default)]
pub struct CoreSchedulerBuilder {
    config: GcConfig,
    snapshots: Option<Arc<dyn SnapshotSource>>,
    oracle: Option<Arc<dyn TimeIndexOracle>>,
    sink: Option<Arc<dyn DeleteSink>>,
    clock: Option<Arc<dyn Clock>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These must be supplied before build().")]
    MissingPorts(Vec<&'static str>),

    #[error(transparent)]
    InvalidConfig(#[from] GcError),
}

impl CoreSchedulerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: GcConfig) -> Self {
        self.config = config;
        self
    }

    pub fn snapshots(mut self, source: impl SnapshotSource + 'static) -> Self {
        self.snapshots = Some(Arc::new(source));
        self
    }

    pub fn oracle(mut self, oracle: impl TimeIndexOracle + 'static) -> Self {
        self.oracle = Some(Arc::new(oracle));
        self
    }

    pub fn sink(mut self, sink: impl DeleteSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Defaults to `SystemClock`.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// # 検証
    /// - snapshots / oracle / sink が全て設定されているかチェック
    /// - GcConfig::validate()
    pub fn build(self) -> Result<CoreScheduler, BuildError> {
        let mut missing = Vec::new();
        if self.snapshots.is_none() {
            missing.push("snapshots");
        }
        if self.oracle.is_none() {
            missing.push("oracle");
        }
        if self.sink.is_none() {
            missing.push("sink");
        }

        match (self.snapshots, self.oracle, self.sink) {
            (Some(snapshots), Some(oracle), Some(sink)) => {
                self.config.validate()?;
                Ok(CoreScheduler::new(
                    self.config,
                    snapshots,
                    oracle,
                    sink,
                    self.clock
                        .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
                ))
            }
            _ => Err(BuildError::MissingPorts(missing)),
        }
    }
}
