pub mod kv_store;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

pub use kv_store::{KeyValueStore, MemoryStore, SqliteStore};

use crate::{config::Config, errors::AppResult};

/// Typed JSON access over a [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalStore {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn open(config: &Config) -> AppResult<Self> {
        let store = SqliteStore::open(&config.storage_dir)?;
        log::info!(
            "✓ Local store ready at {}",
            store.path().unwrap_or(config.storage_dir.as_path()).display()
        );
        Ok(Self::new(Arc::new(store)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn contains(&self, key: &str) -> AppResult<bool> {
        Ok(self.kv.get(key)?.is_some())
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.kv.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Missing collections read as empty.
    pub fn read_collection<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        Ok(self.read(key)?.unwrap_or_default())
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }

    pub fn read_raw(&self, key: &str) -> AppResult<Option<String>> {
        self.kv.get(key)
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        self.kv.remove(key)
    }

    pub fn clear(&self) -> AppResult<()> {
        self.kv.clear()
    }

    pub fn keys(&self) -> AppResult<Vec<String>> {
        self.kv.keys()
    }
}
