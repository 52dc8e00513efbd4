//! GcConfig - GC の設定
//!
//! ```toml
//! eval_gc_threshold_secs = 3600
//! node_gc_threshold_secs = 86400
//! job_gc_threshold_secs = 14400
//! max_ids_per_reap = 7281
//! ```
//!
//! Every field is optional; missing ones take the defaults above.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{GcError, GcKind};

/// 256 KiB worth of 36-byte identifiers.
pub const DEFAULT_MAX_IDS_PER_REAP: usize = (256 * 1024) / 36;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcConfig {
    pub eval_gc_threshold_secs: u64,
    pub node_gc_threshold_secs: u64,
    pub job_gc_threshold_secs: u64,

    /// Upper bound on identifiers per delete transaction.
    pub max_ids_per_reap: usize,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            eval_gc_threshold_secs: 60 * 60,
            node_gc_threshold_secs: 24 * 60 * 60,
            job_gc_threshold_secs: 4 * 60 * 60,
            max_ids_per_reap: DEFAULT_MAX_IDS_PER_REAP,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse gc config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] GcError),
}

impl GcConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GcConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), GcError> {
        if self.max_ids_per_reap == 0 {
            return Err(GcError::Config("max_ids_per_reap must be at least 1".into()));
        }
        for (name, secs) in [
            ("eval_gc_threshold_secs", self.eval_gc_threshold_secs),
            ("node_gc_threshold_secs", self.node_gc_threshold_secs),
            ("job_gc_threshold_secs", self.job_gc_threshold_secs),
        ] {
            if to_duration(secs).is_none() {
                return Err(GcError::Config(format!("{name} out of range: {secs}")));
            }
        }
        Ok(())
    }

    /// Age threshold for `kind`. `None` for a forced run, which has none.
    pub fn threshold_for(&self, kind: GcKind) -> Result<Option<Duration>, GcError> {
        let secs = match kind {
            GcKind::EvalGc => self.eval_gc_threshold_secs,
            GcKind::NodeGc => self.node_gc_threshold_secs,
            GcKind::JobGc => self.job_gc_threshold_secs,
            GcKind::ForceGc => return Ok(None),
        };
        to_duration(secs)
            .map(Some)
            .ok_or_else(|| GcError::Config(format!("{kind} threshold out of range: {secs}")))
    }
}

fn to_duration(secs: u64) -> Option<Duration> {
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}
