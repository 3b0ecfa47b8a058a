//! Decides when to ask for an app store review.
//!
//! Launches are counted until the user has been prompted successfully;
//! the prompt is offered on the 5th and 15th launch.

use log::{error, info, warn};
use std::sync::Arc;

use crate::storage::{KeyValueStorage, PreferenceRepository};

/// Launch numbers on which the review prompt is shown
pub const REVIEW_PROMPT_LAUNCHES: [u32; 2] = [5, 15];

#[derive(Clone)]
pub struct ReviewPromptService {
    preference_repository: PreferenceRepository,
}

impl ReviewPromptService {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            preference_repository: PreferenceRepository::new(storage),
        }
    }

    /// Count a launch; true when this launch should show the review prompt
    pub async fn record_launch(&self) -> bool {
        match self.preference_repository.is_reviewed().await {
            Ok(true) => return false,
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to read review state: {}", e);
                return false;
            }
        }

        let count = match self.preference_repository.get_launch_count().await {
            Ok(count) => count.saturating_add(1),
            Err(e) => {
                warn!("Failed to read launch count: {}", e);
                return false;
            }
        };
        if let Err(e) = self.preference_repository.store_launch_count(count).await {
            error!("Failed to save launch count: {}", e);
        }

        let prompt = REVIEW_PROMPT_LAUNCHES.contains(&count);
        if prompt {
            info!("Launch {}: showing review prompt", count);
        }
        prompt
    }

    /// Stop counting once the store review request has been made
    pub async fn mark_reviewed(&self) {
        if let Err(e) = self.preference_repository.store_reviewed().await {
            error!("Failed to save review state: {}", e);
        }
    }
}
