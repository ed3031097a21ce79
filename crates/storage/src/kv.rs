//! History kept as one JSON array under a single key of a key-value store.

use async_trait::async_trait;
use quiz_core::model::HistoryEntry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::repository::{HistoryRepository, StorageError, cap_len};

/// Key under which the history array is stored.
pub const HISTORY_KEY: &str = "quizHistory";

/// Minimal string key-value capability (browser-style local storage).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value);
        Ok(())
    }
}

/// `HistoryRepository` over any `KeyValueStore`, using read-modify-write.
#[derive(Clone)]
pub struct KeyValueHistoryRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValueHistoryRepository<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn read_all(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        match self.store.get(HISTORY_KEY).await? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> HistoryRepository for KeyValueHistoryRepository<S> {
    async fn prepend_entry(&self, entry: &HistoryEntry, cap: u32) -> Result<(), StorageError> {
        let mut entries = self.read_all().await?;
        entries.insert(0, entry.clone());
        entries.truncate(cap_len(cap));
        let raw = serde_json::to_string(&entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(HISTORY_KEY, raw).await
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryEntry>, StorageError> {
        let mut entries = self.read_all().await?;
        entries.truncate(cap_len(limit));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn entry(topic: &str) -> HistoryEntry {
        HistoryEntry::from_persisted(topic.to_string(), 100, 3, 3, fixed_now(), 12).unwrap()
    }

    #[tokio::test]
    async fn stores_json_array_under_history_key() {
        let store = InMemoryKeyValueStore::new();
        let repo = KeyValueHistoryRepository::new(store.clone());
        repo.prepend_entry(&entry("javascript"), 10).await.unwrap();

        let raw = store.get(HISTORY_KEY).await.unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"correctAnswers\":3"));
    }

    #[tokio::test]
    async fn trims_to_cap_newest_first() {
        let repo = KeyValueHistoryRepository::new(InMemoryKeyValueStore::new());
        for topic in ["a", "b", "c", "d"] {
            repo.prepend_entry(&entry(topic), 3).await.unwrap();
        }

        let topics: Vec<_> = repo
            .list_recent(10)
            .await
            .unwrap()
            .iter()
            .map(|e| e.topic().to_string())
            .collect();
        assert_eq!(topics, ["d", "c", "b"]);
    }

    #[tokio::test]
    async fn missing_key_reads_as_empty() {
        let repo = KeyValueHistoryRepository::new(InMemoryKeyValueStore::new());
        assert!(repo.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_is_a_serialization_error() {
        let store = InMemoryKeyValueStore::new();
        store.set(HISTORY_KEY, "{not json".into()).await.unwrap();
        let repo = KeyValueHistoryRepository::new(store);

        let err = repo.list_recent(10).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn invalid_stored_entry_is_a_serialization_error() {
        let store = InMemoryKeyValueStore::new();
        store
            .set(
                HISTORY_KEY,
                r#"[{"topic":"","score":250,"correctAnswers":9,"totalQuestions":0,"date":"2023-11-14T22:13:20Z","totalTime":5}]"#
                    .to_string(),
            )
            .await
            .unwrap();
        let repo = KeyValueHistoryRepository::new(store);

        let err = repo.list_recent(10).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        let err = repo.prepend_entry(&entry("rust"), 10).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
