use async_trait::async_trait;
use quiz_core::model::HistoryEntry;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the capped list of completed quizzes.
///
/// Entries are kept newest first. Writers trim the list to `cap` entries;
/// concurrent writers are last-writer-wins.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Put an entry at the front of the list and drop everything past `cap`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn prepend_entry(&self, entry: &HistoryEntry, cap: u32) -> Result<(), StorageError>;

    /// Fetch up to `limit` entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the list cannot be read or decoded.
    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryEntry>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

pub(crate) fn cap_len(cap: u32) -> usize {
    usize::try_from(cap).unwrap_or(usize::MAX)
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn prepend_entry(&self, entry: &HistoryEntry, cap: u32) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(0, entry.clone());
        guard.truncate(cap_len(cap));
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryEntry>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().take(cap_len(limit)).cloned().collect())
    }
}

/// Bundles repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let history: Arc<dyn HistoryRepository> = Arc::new(InMemoryRepository::new());
        Self { history }
    }
}
