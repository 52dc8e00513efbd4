//! JSON cluster fixtures.
//!
//! ```json
//! {
//!   "now": "2024-06-01T12:00:00Z",
//!   "time_table": [{ "index": 1000, "time": "2024-05-30T12:00:00Z" }],
//!   "entries": [
//!     { "index": 1000, "jobs": [...], "evals": [...], "allocs": [...], "nodes": [...] }
//!   ]
//! }
//! ```
//!
//! Each entry is committed at its `index`, in file order. Records carry no
//! `modify_index` of their own; they take the entry's.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use reclaim_core::domain::{Allocation, Evaluation, Job, Node};
use reclaim_core::impls::{InMemoryStateStore, InMemoryTimeTable};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    /// Pins the clock; the system clock is used when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,

    #[serde(default)]
    pub time_table: Vec<Witness>,

    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Witness {
    pub index: u64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    pub index: u64,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub evals: Vec<Evaluation>,
    #[serde(default)]
    pub allocs: Vec<Allocation>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse fixture {}", path.display()))
    }

    pub async fn into_store(self) -> (InMemoryStateStore, InMemoryTimeTable) {
        // Fixtures are hand-written; keep every point they list.
        let table = InMemoryTimeTable::new(Duration::zero(), Duration::days(3650));
        for witness in self.time_table {
            table.witness(witness.index, witness.time);
        }

        let store = InMemoryStateStore::new();
        for entry in self.entries {
            for job in entry.jobs {
                store.upsert_job(entry.index, job).await;
            }
            if !entry.evals.is_empty() {
                store.upsert_evals(entry.index, entry.evals).await;
            }
            if !entry.allocs.is_empty() {
                store.upsert_allocs(entry.index, entry.allocs).await;
            }
            for node in entry.nodes {
                store.upsert_node(entry.index, node).await;
            }
        }

        (store, table)
    }
}
