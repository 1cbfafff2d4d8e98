//! JSON-file snapshot store.
//!
//! # Responsibility
//! - Persist one keyed collection per `<name>.json` file under a storage
//!   root.
//! - Create the storage root on first save.
//!
//! # Invariants
//! - A save either replaces the whole file or fails; partially written
//!   content is never left under the final name.
//! - Snapshots of different names never share a file.

use super::{SnapshotStore, StoreError, StoreResult};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Snapshot store writing pretty-printed JSON files.
pub struct JsonSnapshotStore {
    root: PathBuf,
}

impl JsonSnapshotStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// the first save, so construction never touches the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn save<T: Serialize>(&self, name: &str, records: &BTreeMap<String, T>) -> StoreResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            name: name.to_string(),
            source,
        })?;

        let encoded =
            serde_json::to_string_pretty(records).map_err(|source| StoreError::Encode {
                name: name.to_string(),
                source,
            })?;

        // Write to a sibling temp file first so a crash mid-write cannot
        // leave a truncated snapshot under the final name.
        let path = self.snapshot_path(name);
        let tmp_path = self.root.join(format!("{name}.json.tmp"));
        fs::write(&tmp_path, encoded).map_err(|source| StoreError::Io {
            name: name.to_string(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| StoreError::Io {
            name: name.to_string(),
            source,
        })?;

        info!(
            "event=snapshot_save module=store status=ok name={} records={}",
            name,
            records.len()
        );
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<BTreeMap<String, T>>> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            name: name.to_string(),
            source,
        })?;
        let records = serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
            name: name.to_string(),
            source,
        })?;

        Ok(Some(records))
    }
}
