//! # Config Repository
//!
//! File-based app configuration stored as `app_config.yaml` at the root of
//! the data directory.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_format_version: "1.0"
//! created_at: "2025-01-21T19:30:00Z"
//! updated_at: "2025-01-21T19:35:00Z"
//! ```
//!
//! The version lets a future release detect data written by an older one
//! before it touches any key.

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::file::FileConnection;

/// Data format written by this version of the app
pub const CURRENT_DATA_FORMAT_VERSION: &str = "1.0";

const CONFIG_FILE_NAME: &str = "app_config.yaml";

/// App configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data format version for future migrations
    pub data_format_version: String,
    /// When the config was first created
    pub created_at: String,
    /// When the config was last updated
    pub updated_at: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            data_format_version: CURRENT_DATA_FORMAT_VERSION.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl AppConfig {
    pub fn is_current_format(&self) -> bool {
        self.data_format_version == CURRENT_DATA_FORMAT_VERSION
    }
}

/// Repository for the YAML app config
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    connection: FileConnection,
}

impl ConfigRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn config_path(&self) -> PathBuf {
        self.connection.base_directory().join(CONFIG_FILE_NAME)
    }

    /// Load the config from disk, creating the default one if it doesn't exist
    pub fn load_or_create(&self) -> Result<AppConfig> {
        let config_path = self.config_path();

        if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)?;
            let config: AppConfig = serde_yaml::from_str(&yaml_content)?;
            debug!("Loaded app config from {:?}", config_path);

            if !config.is_current_format() {
                warn!(
                    "Data format version {} differs from current version {}",
                    config.data_format_version, CURRENT_DATA_FORMAT_VERSION
                );
            }
            Ok(config)
        } else {
            let config = AppConfig::default();
            self.save(&config)?;
            info!("Created default app config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Save the config, stamping `updated_at`
    pub fn update(&self, config: &AppConfig) -> Result<AppConfig> {
        let mut updated = config.clone();
        updated.updated_at = Utc::now().to_rfc3339();
        self.save(&updated)?;
        info!("Updated app config");
        Ok(updated)
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        let config_path = self.config_path();
        let yaml_content = serde_yaml::to_string(config)?;

        // Write to temp file, then rename
        let temp_path = config_path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;

        debug!("Saved app config to {:?}", config_path);
        Ok(())
    }
}
