use async_trait::async_trait;
use benki_core::model::{ProgressKey, ProgressRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable string key-value capability.
///
/// Writes are complete when the returned future resolves; a `get` issued
/// afterwards observes them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Typed access to progress records on top of any `KeyValueStore`.
#[derive(Clone)]
pub struct ProgressRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for a corrupt payload, or the
    /// store's error if it cannot be read.
    pub async fn load(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, StorageError> {
        let Some(raw) = self.store.get(key.as_str()).await? else {
            return Ok(None);
        };
        ProgressRecord::from_json(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Persist `record` under `key`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save(
        &self,
        key: &ProgressKey,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let raw = record
            .to_json()
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set(key.as_str(), &raw).await
    }
}

/// Key-value backend behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryRepository::new());
        Self { kv }
    }

    #[must_use]
    pub fn progress(&self) -> ProgressRepository {
        ProgressRepository::new(Arc::clone(&self.kv))
    }
}
