//! Persistence gateway contracts and snapshot stores.
//!
//! # Responsibility
//! - Define the durable save/load contract for one named keyed collection.
//! - Keep encoding and filesystem details out of the catalog layer.
//!
//! # Invariants
//! - `save` overwrites the named resource wholesale and propagates I/O
//!   failures to the caller.
//! - `load` distinguishes "resource absent" (`Ok(None)`) from "resource
//!   present but undecodable" (`Err(StoreError::Decode { .. })`).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_store;
pub mod memory_store;

pub use json_store::JsonSnapshotStore;
pub use memory_store::MemorySnapshotStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by snapshot save/load operations.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure while reading or writing the named resource.
    Io {
        name: String,
        source: std::io::Error,
    },
    /// The collection could not be serialized.
    Encode {
        name: String,
        source: serde_json::Error,
    },
    /// The named resource exists but is corrupt or of incompatible shape.
    Decode {
        name: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { name, source } => {
                write!(f, "i/o failure on snapshot `{name}`: {source}")
            }
            Self::Encode { name, source } => {
                write!(f, "failed to encode snapshot `{name}`: {source}")
            }
            Self::Decode { name, source } => {
                write!(f, "failed to decode snapshot `{name}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
        }
    }
}

/// Durable store for named keyed collections.
///
/// The catalog persists each entity collection as one snapshot, keyed by
/// record id. Implementations choose the encoding and the storage medium;
/// the round-trip must reproduce identical records.
pub trait SnapshotStore {
    /// Writes the keyed collection under `name`, replacing any previous
    /// snapshot of that name.
    fn save<T: Serialize>(&self, name: &str, records: &BTreeMap<String, T>) -> StoreResult<()>;

    /// Reads the snapshot named `name`.
    ///
    /// Returns `Ok(None)` when no such snapshot exists.
    fn load<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<BTreeMap<String, T>>>;
}
