use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the default data directory
pub const DATA_DIR_ENV: &str = "STAMP_CARD_DATA_DIR";

/// Name of the app's folder inside the platform data directory
const APP_DIRECTORY_NAME: &str = "Stamp Card";

/// FileConnection owns the data directory all file-backed storage lives in
#[derive(Debug, Clone)]
pub struct FileConnection {
    base_directory: PathBuf,
}

impl FileConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default data directory
    ///
    /// Uses `$STAMP_CARD_DATA_DIR` when set, otherwise `<platform data dir>/Stamp Card`.
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_data_directory()?)
    }

    /// Resolve the default data directory without creating it
    pub fn default_data_directory() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            let dir = dir.trim();
            if !dir.is_empty() {
                info!("Using data directory from {}: {}", DATA_DIR_ENV, dir);
                return Ok(PathBuf::from(dir));
            }
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine platform data directory"))?;
        Ok(data_dir.join(APP_DIRECTORY_NAME))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the file that holds the value for `key`
    ///
    /// Keys are restricted to ASCII letters, digits, `_` and `-` so that a key
    /// can never escape the data directory.
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow::anyhow!("Invalid storage key: '{}'", key));
        }
        Ok(self.base_directory.join(format!("{}.kv", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let connection = FileConnection::new(&nested).unwrap();

        assert!(nested.exists());
        assert_eq!(connection.base_directory(), nested.as_path());
    }

    #[test]
    fn test_key_path_rejects_unsafe_keys() {
        let temp_dir = TempDir::new().unwrap();
        let connection = FileConnection::new(temp_dir.path()).unwrap();

        assert!(connection.key_path("stamp_card").is_ok());
        assert!(connection.key_path("app-launch-count").is_ok());
        assert!(connection.key_path("").is_err());
        assert!(connection.key_path("../escape").is_err());
        assert!(connection.key_path("a/b").is_err());
    }
}
