//! Test utilities with automatic cleanup.
//!
//! `TestEnvironment` owns a temp directory that is removed when it is
//! dropped, even if the test panics.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use super::file::{FileConnection, FileStorage};
use super::memory::MemoryStorage;
use super::traits::KeyValueStorage;

/// RAII test environment around a temporary data directory
pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: FileConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        Self::from_temp_dir(temp_dir)
    }

    /// Same as `new` with a recognisable directory prefix for debugging
    pub async fn new_with_prefix(prefix: &str) -> Result<Self> {
        let temp_dir = TempDir::with_prefix(prefix)?;
        Self::from_temp_dir(temp_dir)
    }

    fn from_temp_dir(temp_dir: TempDir) -> Result<Self> {
        let base_path = temp_dir.path().to_path_buf();
        let connection = FileConnection::new(&base_path)?;
        Ok(Self {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// File storage rooted in this environment
    pub fn file_storage(&self) -> Arc<dyn KeyValueStorage> {
        Arc::new(FileStorage::new(self.connection.clone()))
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("STAMP_CARD_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// Fresh in-memory storage as a trait object, the common test setup
pub fn memory_storage() -> (MemoryStorage, Arc<dyn KeyValueStorage>) {
    let storage = MemoryStorage::new();
    let shared: Arc<dyn KeyValueStorage> = Arc::new(storage.clone());
    (storage, shared)
}

/// Storage whose every call fails, for exercising fallback paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStorage;

#[async_trait::async_trait]
impl KeyValueStorage for FailingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Err(anyhow::anyhow!("read of '{}' failed", key))
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow::anyhow!("write of '{}' failed", key))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Err(anyhow::anyhow!("remove of '{}' failed", key))
    }
}

/// Route `log` output through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_environment_cleanup() -> Result<()> {
        let base_path;

        {
            let env = TestEnvironment::new_with_prefix("stamp_card_test").await?;
            base_path = env.base_directory().to_path_buf();
            assert!(base_path.exists());

            env.file_storage().set("stamp_card", "{}").await?;
            assert!(base_path.join("stamp_card.kv").exists());
        }

        assert!(!base_path.exists());
        Ok(())
    }
}
