use anyhow::Result;
use log::debug;
use serde_json::Value;
use shared::StampCard;
use std::sync::Arc;

use super::{GOAL_KEY, STAMP_CARD_KEY};
use crate::storage::traits::KeyValueStorage;

/// Storage access for the stamp card record and the goal
#[derive(Clone)]
pub struct StampCardRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl StampCardRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Raw stored goal string, unvalidated
    pub async fn get_goal(&self) -> Result<Option<String>> {
        self.storage.get(GOAL_KEY).await
    }

    pub async fn store_goal(&self, goal: u32) -> Result<()> {
        self.storage.set(GOAL_KEY, &goal.to_string()).await
    }

    /// The stored card as an untyped JSON document
    ///
    /// Shape validation is left to the caller; only unparseable JSON is an
    /// error here.
    pub async fn get_card_document(&self) -> Result<Option<Value>> {
        let Some(json) = self.storage.get(STAMP_CARD_KEY).await? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&json)
            .map_err(|e| anyhow::anyhow!("Stored stamp card is not valid JSON: {}", e))?;
        Ok(Some(value))
    }

    pub async fn store_card(&self, card: &StampCard) -> Result<()> {
        let json = serde_json::to_string(card)?;
        self.storage.set(STAMP_CARD_KEY, &json).await?;
        debug!(
            "Stored stamp card: {}/{} filled, {} completed",
            card.filled_count(),
            card.goal(),
            card.completed_count
        );
        Ok(())
    }
}
