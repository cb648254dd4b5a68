//! Durable client-side state
//!
//! A small key-value store that keeps state between runs: the selected
//! property id and the session cookies. Keys are namespaced per API base
//! URL so two backends never share a selection.

pub mod key;
pub mod sqlite;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

pub use key::scope_prefix;
pub use sqlite::SqliteStore;

type Result<T> = std::result::Result<T, StorageError>;

/// Key under which the selected property id is persisted
pub const SELECTED_PROPERTY_KEY: &str = "selectedPgId";

/// Key under which the session cookie header is persisted
pub const SESSION_COOKIES_KEY: &str = "sessionCookies";

/// String key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, used for one-shot overrides and tests
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Store view that prefixes every key with a namespace
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ScopedStore {
    /// Scope `inner` to the given API base URL
    pub fn for_api_url(inner: Arc<dyn KeyValueStore>, api_url: &str) -> Self {
        Self {
            inner,
            prefix: scope_prefix(api_url),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(&self.scoped(key))
    }
}
