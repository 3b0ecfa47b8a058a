//! In-process key-value store.
//!
//! Used by tests and by frontends that bring their own persistence and only
//! need the domain logic.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::KeyValueStorage;

/// `KeyValueStorage` backed by a shared `HashMap`
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
