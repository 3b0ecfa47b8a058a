//! Stamp flow orchestration.
//!
//! Ties the stamp card and the milestone tracker together the way the main
//! screen uses them: add a stamp, then evaluate milestones against the new
//! lifetime total. Frontends that need finer control can call the two
//! services directly.

use log::info;
use shared::{StampCard, StampOutcome};

use crate::domain::milestone_service::MilestoneService;
use crate::domain::models::stamp_card::GoalValidationError;
use crate::domain::stamp_card_service::StampCardService;

#[derive(Clone)]
pub struct StampFlowService {
    stamp_card_service: StampCardService,
    milestone_service: MilestoneService,
}

impl StampFlowService {
    pub fn new(stamp_card_service: StampCardService, milestone_service: MilestoneService) -> Self {
        Self {
            stamp_card_service,
            milestone_service,
        }
    }

    /// Add a stamp to the stored card and check milestones
    ///
    /// `None` when the card is already full; in that case nothing is written
    /// and milestones are not evaluated.
    pub async fn add_stamp(&self) -> Option<StampOutcome> {
        let card = self.stamp_card_service.load_card(None).await;
        let updated = self.stamp_card_service.add_stamp(&card).await?;

        let filled_index = updated.last_filled_index().unwrap_or(0);
        let card_completed = updated.is_complete();
        let check = self
            .milestone_service
            .check_and_update(updated.lifetime_total())
            .await;

        if card_completed {
            info!("Stamp {} completed the card", filled_index + 1);
        }

        Some(StampOutcome {
            card: updated,
            filled_index,
            card_completed,
            milestones: check.milestones,
            newly_achieved: check.newly_achieved,
        })
    }

    /// Undo the most recent stamp on the stored card
    pub async fn undo_stamp(&self) -> Option<StampCard> {
        let card = self.stamp_card_service.load_card(None).await;
        self.stamp_card_service.remove_stamp(&card).await
    }

    pub async fn change_goal(&self, goal: u32) -> Result<StampCard, GoalValidationError> {
        self.stamp_card_service.change_goal(goal).await
    }

    /// Begin a new card after a completed one was celebrated
    pub async fn start_new_card(&self) -> StampCard {
        self.stamp_card_service.reset_stamp_card().await
    }

    /// Zero the lifetime statistics; achieved milestones stay achieved
    pub async fn reset_total(&self) -> StampCard {
        self.stamp_card_service.reset_total().await
    }

    pub async fn clear_all_data(&self) -> StampCard {
        self.stamp_card_service.clear_all_data().await
    }
}
