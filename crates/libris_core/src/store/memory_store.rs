//! In-memory snapshot store for tests and embedding.
//!
//! Plays the role the in-memory database plays elsewhere: same contract as
//! the file-backed store, no disk involved. Values are held as serialized
//! JSON so encode/decode behavior matches the durable path.

use super::{SnapshotStore, StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// Snapshot store keeping encoded collections in process memory.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RefCell<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a snapshot of the given name has been saved.
    pub fn contains(&self, name: &str) -> bool {
        self.snapshots.borrow().contains_key(name)
    }

    /// Replaces the raw content of a named snapshot.
    ///
    /// Test hook for simulating corrupt or incompatible snapshots.
    pub fn put_raw(&self, name: &str, raw: impl Into<String>) {
        self.snapshots.borrow_mut().insert(name.to_string(), raw.into());
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save<T: Serialize>(&self, name: &str, records: &BTreeMap<String, T>) -> StoreResult<()> {
        let encoded = serde_json::to_string(records).map_err(|source| StoreError::Encode {
            name: name.to_string(),
            source,
        })?;
        self.snapshots.borrow_mut().insert(name.to_string(), encoded);
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<BTreeMap<String, T>>> {
        let snapshots = self.snapshots.borrow();
        let Some(raw) = snapshots.get(name) else {
            return Ok(None);
        };
        let records = serde_json::from_str(raw).map_err(|source| StoreError::Decode {
            name: name.to_string(),
            source,
        })?;
        Ok(Some(records))
    }
}
