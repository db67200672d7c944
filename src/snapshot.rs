//! @ai:module:intent Scratch-space JSON snapshots of per-matcher results
//! @ai:module:layer infrastructure
//! @ai:module:public_api SnapshotStore
//! @ai:module:stateless true

use crate::corpus::QueryKey;
use crate::error::{HarnessError, Result};
use crate::results::{ResultEntry, ResultTable};
use crate::selection::MatcherId;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// @ai:intent Reads and writes `quality-{tag}-latest.json` files in a scratch directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// @ai:effects pure
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// @ai:intent Snapshot location for a matcher
    /// @ai:effects pure
    pub fn path_for(&self, matcher: MatcherId) -> PathBuf {
        self.dir.join(format!("quality-{}-latest.json", matcher.tag()))
    }

    /// @ai:intent Persist a result table, overwriting any previous snapshot
    /// @ai:post file maps `"{query}\t{field}"` to the raw entry array
    /// @ai:effects fs:write
    pub fn save(&self, matcher: MatcherId, table: &ResultTable) -> Result<PathBuf> {
        let document: BTreeMap<String, &Vec<ResultEntry>> = table
            .iter()
            .map(|(key, entries)| (key.to_snapshot_key(), entries))
            .collect();

        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(matcher);
        std::fs::write(&path, serde_json::to_string(&document)?)?;

        tracing::debug!("Saved {} keys to {}", document.len(), path.display());
        Ok(path)
    }

    /// @ai:intent Reload a snapshot written by `save`
    /// @ai:pre snapshot exists for the matcher
    /// @ai:effects fs:read
    pub fn load(&self, matcher: MatcherId) -> Result<ResultTable> {
        let path = self.path_for(matcher);
        let content = std::fs::read_to_string(&path)?;
        let document: BTreeMap<String, Vec<ResultEntry>> = serde_json::from_str(&content)?;

        document
            .into_iter()
            .map(|(raw, entries)| {
                QueryKey::from_snapshot_key(&raw)
                    .map(|key| (key, entries))
                    .ok_or_else(|| {
                        HarnessError::Config(format!(
                            "snapshot {} has malformed key {:?}",
                            path.display(),
                            raw
                        ))
                    })
            })
            .collect()
    }
}
