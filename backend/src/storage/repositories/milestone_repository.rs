use anyhow::Result;
use log::{debug, warn};
use serde_json::Value;
use shared::Milestone;
use std::sync::Arc;

use super::MILESTONES_KEY;
use crate::storage::traits::KeyValueStorage;

/// Storage access for the milestone list
#[derive(Clone)]
pub struct MilestoneRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl MilestoneRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the stored list
    ///
    /// Returns `Ok(None)` when nothing is stored and an error when the stored
    /// value is not a JSON array. Elements that don't parse as a milestone are
    /// skipped.
    pub async fn get_milestones(&self) -> Result<Option<Vec<Milestone>>> {
        let Some(json) = self.storage.get(MILESTONES_KEY).await? else {
            return Ok(None);
        };

        let value: Value = serde_json::from_str(&json)
            .map_err(|e| anyhow::anyhow!("Stored milestones are not valid JSON: {}", e))?;
        let Value::Array(items) = value else {
            return Err(anyhow::anyhow!("Stored milestones are not a list"));
        };

        let mut milestones = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Milestone>(item) {
                Ok(milestone) => milestones.push(milestone),
                Err(e) => {
                    warn!("Failed to parse milestone at index {}: {}. Skipping.", index, e);
                    continue;
                }
            }
        }

        Ok(Some(milestones))
    }

    pub async fn store_milestones(&self, milestones: &[Milestone]) -> Result<()> {
        let json = serde_json::to_string(milestones)?;
        self.storage.set(MILESTONES_KEY, &json).await?;
        debug!("Stored {} milestones", milestones.len());
        Ok(())
    }
}
