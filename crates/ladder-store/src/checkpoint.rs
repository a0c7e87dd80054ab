use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};

pub const CHECKPOINT_FILE: &str = "last.json";
pub const FIRST_PAGE: u64 = 1;

/// Persisted crawl cursor: the next page number to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCheckpoint")]
pub struct Checkpoint {
    pub page: u64,
}

impl Default for Checkpoint {
    fn default() -> Self { Self { page: FIRST_PAGE } }
}

impl Checkpoint {
    pub fn at(page: u64) -> Self {
        Self {
            page: page.max(FIRST_PAGE),
        }
    }
}

#[derive(Deserialize)]
struct RawCheckpoint {
    #[serde(default)]
    page: Value,
}

impl From<RawCheckpoint> for Checkpoint {
    fn from(raw: RawCheckpoint) -> Self {
        let page = match raw.page {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(FIRST_PAGE as i64),
            Value::String(s) => s.trim().parse().unwrap_or(FIRST_PAGE as i64),
            _ => FIRST_PAGE as i64,
        };
        Checkpoint::at(page.max(FIRST_PAGE as i64) as u64)
    }
}

/// The checkpoint file of one target's storage root.
#[derive(Debug, Clone)]
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    pub fn in_root(root: impl AsRef<Path>) -> Self {
        Self {
            path: root.as_ref().join(CHECKPOINT_FILE),
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Missing or unreadable checkpoints resume from [`FIRST_PAGE`].
    pub fn load(&self) -> Checkpoint { ladder_fs::read_json_or_default(&self.path) }

    pub fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        ladder_fs::atomic_write_json(&self.path, checkpoint).map_err(StoreError::Checkpoint)
    }
}
