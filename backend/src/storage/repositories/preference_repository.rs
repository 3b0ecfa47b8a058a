use anyhow::Result;
use std::sync::Arc;

use super::{LAUNCH_COUNT_KEY, PREMIUM_KEY, REVIEWED_KEY, THEME_KEY};
use crate::storage::traits::KeyValueStorage;

/// Storage access for small app preferences: theme, premium flag, review prompt state
#[derive(Clone)]
pub struct PreferenceRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl PreferenceRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Raw stored theme key
    pub async fn get_theme(&self) -> Result<Option<String>> {
        self.storage.get(THEME_KEY).await
    }

    pub async fn store_theme(&self, theme: &str) -> Result<()> {
        self.storage.set(THEME_KEY, theme).await
    }

    /// True only when the flag is stored as exactly "true"
    pub async fn get_premium_flag(&self) -> Result<bool> {
        Ok(self.storage.get(PREMIUM_KEY).await?.as_deref() == Some("true"))
    }

    pub async fn store_premium_flag(&self) -> Result<()> {
        self.storage.set(PREMIUM_KEY, "true").await
    }

    /// Stored launch count; missing or unparseable counts read as 0
    pub async fn get_launch_count(&self) -> Result<u32> {
        let count = self
            .storage
            .get(LAUNCH_COUNT_KEY)
            .await?
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);
        Ok(count)
    }

    pub async fn store_launch_count(&self, count: u32) -> Result<()> {
        self.storage.set(LAUNCH_COUNT_KEY, &count.to_string()).await
    }

    /// Any stored value counts as reviewed
    pub async fn is_reviewed(&self) -> Result<bool> {
        Ok(self
            .storage
            .get(REVIEWED_KEY)
            .await?
            .is_some_and(|v| !v.is_empty()))
    }

    pub async fn store_reviewed(&self) -> Result<()> {
        self.storage.set(REVIEWED_KEY, "true").await
    }
}
