//! # File Key-Value Storage
//!
//! Stores each key in its own file inside the data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── app_config.yaml
//! ├── stamp_card.kv     ← JSON stamp card
//! ├── totalGoal.kv      ← "12"
//! ├── milestones.kv     ← JSON milestone list
//! └── theme.kv          ← "default"
//! ```
//!
//! Writes go to a temp file first and are then renamed over the target, so a
//! reader never observes a half-written value.

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;

use super::connection::FileConnection;
use crate::storage::traits::KeyValueStorage;

/// File-backed `KeyValueStorage`
#[derive(Debug, Clone)]
pub struct FileStorage {
    connection: FileConnection,
}

impl FileStorage {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.connection.key_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.connection.key_path(key)?;
        let temp_path = path.with_extension("kv.tmp");

        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.connection.key_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
