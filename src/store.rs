//! Local Store
//!
//! Small file-backed key/value store for user state such as transit search
//! history. Every key is namespaced with [`KEY_PREFIX`] and every value is
//! wrapped as `{"v": value}` so that `null` can be told apart from a missing
//! entry.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

/// Namespace applied to every key
pub const KEY_PREFIX: &str = "mv:";

/// Default file name inside the data directory
pub const STORE_FILE: &str = "state.json";

/// Errors raised when persisting the store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path:?}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// JSON file holding prefixed, wrapped values
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl LocalStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Store file is corrupt, starting empty");
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Failed to read store file, starting empty");
                Map::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Open `state.json` inside `data_dir`
    pub async fn open_in(data_dir: impl AsRef<Path>) -> Self {
        Self::open(data_dir.as_ref().join(STORE_FILE)).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a value, falling back to `default` when the key is missing or
    /// holds something that does not decode as `T`
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let entries = self.entries.lock().await;

        decode(entries.get(&prefixed(key))).unwrap_or(default)
    }

    /// Store a value and persist the whole map
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.lock().await;

        let mut next = entries.clone();
        next.insert(prefixed(key), wrap(value));
        self.commit(&mut entries, next).await
    }

    /// Read, modify and persist a value while holding the store lock, so
    /// concurrent updates of the same key are applied one after another.
    /// Returns the stored value.
    pub async fn update<T, F>(&self, key: &str, default: T, apply: F) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let mut entries = self.entries.lock().await;
        let key = prefixed(key);

        let mut value = decode(entries.get(&key)).unwrap_or(default);
        apply(&mut value);

        let mut next = entries.clone();
        next.insert(key, wrap(serde_json::to_value(&value)?));
        self.commit(&mut entries, next).await?;

        Ok(value)
    }

    /// Delete a key. Removing a missing key is not an error.
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;

        let mut next = entries.clone();
        if next.remove(&prefixed(key)).is_some() {
            self.commit(&mut entries, next).await?;
        }
        Ok(())
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(&prefixed(key))
    }

    /// Persist `next` and only then make it the in-memory state
    async fn commit(
        &self,
        entries: &mut Map<String, Value>,
        next: Map<String, Value>,
    ) -> StoreResult<()> {
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    /// Write to a sibling temp file then rename over the target
    async fn persist(&self, entries: &Map<String, Value>) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let io_err = |error: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            error,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        Ok(())
    }
}

fn prefixed(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}

fn wrap(value: Value) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert("v".to_string(), value);
    Value::Object(wrapped)
}

fn decode<T: DeserializeOwned>(wrapped: Option<&Value>) -> Option<T> {
    wrapped
        .and_then(|wrapped| wrapped.get("v"))
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_get_missing_returns_default() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).await;

        let value: Vec<String> = store.get("sbb:history", Vec::new()).await;
        assert!(value.is_empty());
        assert!(!store.contains("sbb:history").await);
    }

    #[tokio::test]
    async fn test_set_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).await;
        store.set("string:from", &"Zürich HB").await.unwrap();

        let reopened = LocalStore::open_in(dir.path()).await;
        let value: String = reopened.get("string:from", String::new()).await;
        assert_eq!(value, "Zürich HB");
    }

    #[tokio::test]
    async fn test_on_disk_format_is_prefixed_and_wrapped() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).await;
        store.set("count", &3).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["mv:count"]["v"], 3);
    }

    #[tokio::test]
    async fn test_mismatched_type_returns_default() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).await;
        store.set("count", &"not a number").await.unwrap();

        let value: u32 = store.get("count", 7).await;
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let store = LocalStore::open(&path).await;
        let value: bool = store.get("toggle:x", true).await;
        assert!(value);

        store.set("toggle:x", &false).await.unwrap();
        let value: bool = store.get("toggle:x", true).await;
        assert!(!value);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).await;
        store.set("k", &1).await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("never-set").await.unwrap();

        assert!(!store.contains("k").await);
        let reopened = LocalStore::open_in(dir.path()).await;
        assert_eq!(reopened.get("k", 0).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).await;

        let updates = (0..20).map(|i| {
            store.update("list", Vec::<u32>::new(), move |list| list.push(i))
        });
        for result in futures_util::future::join_all(updates).await {
            result.unwrap();
        }

        let mut list: Vec<u32> = store.get("list", Vec::new()).await;
        list.sort_unstable();
        assert_eq!(list, (0..20).collect::<Vec<_>>());

        let reopened = LocalStore::open_in(dir.path()).await;
        assert_eq!(reopened.get("list", Vec::<u32>::new()).await.len(), 20);
    }

    #[tokio::test]
    async fn test_update_returns_stored_value() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open_in(dir.path()).await;
        store.set("count", &"garbage").await.unwrap();

        // undecodable entries start from the default
        let value = store.update("count", 10u32, |n| *n += 1).await.unwrap();
        assert_eq!(value, 11);
        assert_eq!(store.get("count", 0u32).await, 11);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempdir().unwrap();
        // a regular file where the store directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let store = LocalStore::open_in(&blocker).await;

        assert!(store.set("k", &1).await.is_err());
        assert!(!store.contains("k").await);

        assert!(store.update("k", 0, |n| *n = 5).await.is_err());
        assert_eq!(store.get("k", 0).await, 0);
    }
}
