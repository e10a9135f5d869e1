//! Durable snapshots of store state, one JSON file per storage key.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub const AUTH_KEY: &str = "auth-storage";
pub const GROUP_KEY: &str = "group-storage";
pub const GROUP_DETAIL_KEY: &str = "groupDetail-storage";
pub const FRIEND_KEY: &str = "friend-storage";
pub const ACTIVITY_KEY: &str = "activity-storage";

/// Reads and writes `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Write a snapshot atomically (temp file + rename).
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }

    /// Load a snapshot. Missing or unreadable snapshots yield `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path(key);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable snapshot");
                None
            }
        }
    }

    /// Delete a snapshot. Deleting a missing snapshot is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Save through an optional store, logging instead of failing.
pub(crate) fn save_or_warn<T: Serialize>(store: Option<&SnapshotStore>, key: &str, value: &T) {
    if let Some(store) = store {
        if let Err(e) = store.save(key, value) {
            tracing::warn!(key, error = %e, "failed to persist snapshot");
        }
    }
}

#[cfg(test)]
pub(crate) fn temp_store(name: &str) -> SnapshotStore {
    let dir = std::env::temp_dir().join(format!("buddy-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    SnapshotStore::new(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        items: Vec<u32>,
        page: u32,
    }

    #[test]
    fn test_save_then_load() {
        let store = temp_store("persist-save");
        let value = Sample {
            items: vec![1, 2],
            page: 1,
        };
        store.save(GROUP_KEY, &value).unwrap();
        assert_eq!(store.load::<Sample>(GROUP_KEY), Some(value));
        assert!(!store.dir().join(".group-storage.json.tmp").exists());
    }

    #[test]
    fn test_load_missing_or_corrupt_is_none() {
        let store = temp_store("persist-corrupt");
        assert!(store.load::<Sample>(FRIEND_KEY).is_none());
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join("friend-storage.json"), "{not json").unwrap();
        assert!(store.load::<Sample>(FRIEND_KEY).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = temp_store("persist-remove");
        store.save(AUTH_KEY, &Sample { items: vec![], page: 0 }).unwrap();
        store.remove(AUTH_KEY).unwrap();
        store.remove(AUTH_KEY).unwrap();
        assert!(store.load::<Sample>(AUTH_KEY).is_none());
    }
}
