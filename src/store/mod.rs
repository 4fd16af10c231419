//! Persistence of the whole tracker state as one JSON blob under one key.
//!
//! The storage mechanism is abstract: anything implementing [`BlobStore`]
//! works. [`load_or_init`] is the recovery path: an absent, unreadable or
//! undecodable blob yields a freshly initialized state instead of an error.

mod sqlite;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::calendar::{Month, Roster};
use crate::error::{Result, TrackerError};
use crate::models::{init_state, TrackerState};

pub use sqlite::SqliteStore;

/// Storage key for the tracker blob.
pub const STORAGE_KEY: &str = "kindling-q1-tracker";

/// A get/set store of text blobs.
pub trait BlobStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> Result<()>;
}

/// In-process store. Contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `blob` under `key`.
    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut blobs) = store.blobs.lock() {
            blobs.insert(key.to_string(), blob.into());
        }
        store
    }
}

impl BlobStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| TrackerError::Storage("memory store lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| TrackerError::Storage("memory store lock poisoned".to_string()))?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

pub fn encode(state: &TrackerState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

/// Decode a stored blob. Fails with [`TrackerError::CorruptPersistedState`]
/// when the text is not a tracker state.
pub fn decode(blob: &str) -> Result<TrackerState> {
    Ok(serde_json::from_str(blob)?)
}

/// Encode `state` and write it under `key`.
pub fn save_state(store: &impl BlobStore, key: &str, state: &TrackerState) -> Result<()> {
    let blob = encode(state).map_err(|e| TrackerError::Storage(e.to_string()))?;
    store.save(key, &blob)
}

/// Load the state stored under `key`, or initialize a fresh one.
///
/// A decoded state is reconciled with `roster` and `months` so its keys match
/// the current calendar.
pub fn load_or_init(
    store: &impl BlobStore,
    key: &str,
    roster: &Roster,
    months: &[Month],
) -> TrackerState {
    let blob = match store.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            tracing::info!("No stored tracker state under {}, initializing", key);
            return init_state(roster, months);
        }
        Err(e) => {
            tracing::warn!("Failed to read tracker state, initializing: {}", e);
            return init_state(roster, months);
        }
    };

    match decode(&blob) {
        Ok(state) => {
            let (state, report) = state.reconcile(roster, months);
            if !report.is_empty() {
                tracing::warn!(
                    added = ?report.added,
                    dropped = ?report.dropped,
                    "Stored tracker state did not match the calendar, reconciled"
                );
            }
            state
        }
        Err(e) => {
            tracing::warn!("{}; starting from a fresh tracker state", e);
            init_state(roster, months)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(matches!(
            decode("{\"Nick\": {\"January\": {\"planning\": 3}}}"),
            Err(TrackerError::CorruptPersistedState(_))
        ));
        assert!(matches!(
            decode("not json"),
            Err(TrackerError::CorruptPersistedState(_))
        ));
    }

    #[test]
    fn test_encoded_blob_uses_original_field_names() {
        let state = init_state(&Roster::default(), &[Month::January]);
        let value: serde_json::Value = serde_json::from_str(&encode(&state).unwrap()).unwrap();
        let sprint = &value["Nick"]["January"]["sprints"]["W3-4"];
        assert_eq!(sprint["scopeLocked"], serde_json::json!(false));
        assert_eq!(value["Tash"]["January"]["reporting"]["Monthly"]["notes"], "");
    }

    #[test]
    fn test_memory_store_with_blob() {
        let store = MemoryStore::with_blob(STORAGE_KEY, "{}");
        assert_eq!(store.load(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
        assert_eq!(store.load("other").unwrap(), None);
    }
}
