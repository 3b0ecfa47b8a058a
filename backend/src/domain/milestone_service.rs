//! Milestone tracking.
//!
//! Milestones are rewards tied to a lifetime stamp count. Evaluation is
//! monotonic: once a milestone is achieved it stays achieved, even if the
//! lifetime total is later reset below its threshold.
//!
//! The tracker keeps the list in stored order and does not sort it; picking
//! the next target for display is the roadmap's job.

use log::{error, info, warn};
use shared::{default_milestones, Milestone, MilestoneCheckResult, EMOJI_OPTIONS};
use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::commands::milestone::MilestoneUpdate;
use crate::domain::models::milestone::{apply_update, next_milestone, MilestoneEditError};
use crate::storage::{KeyValueStorage, MilestoneRepository};

/// Service for the milestone list and its achievement state
#[derive(Clone)]
pub struct MilestoneService {
    milestone_repository: MilestoneRepository,
    clock: Arc<dyn Clock>,
}

impl MilestoneService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            milestone_repository: MilestoneRepository::new(storage),
            clock,
        }
    }

    /// Reward emoji the milestone editor offers
    pub fn emoji_options(&self) -> &'static [&'static str] {
        &EMOJI_OPTIONS
    }

    /// Stored milestones, or the default list when nothing usable is stored
    pub async fn load_milestones(&self) -> Vec<Milestone> {
        match self.milestone_repository.get_milestones().await {
            Ok(Some(milestones)) => milestones,
            Ok(None) => default_milestones(),
            Err(e) => {
                warn!("Failed to read milestones: {}. Using defaults.", e);
                default_milestones()
            }
        }
    }

    /// Persist the list verbatim
    pub async fn save_milestones(&self, milestones: &[Milestone]) {
        if let Err(e) = self.milestone_repository.store_milestones(milestones).await {
            error!("Failed to save milestones: {}", e);
        }
    }

    /// Mark every unachieved milestone whose threshold `total_stamps` reaches
    ///
    /// The list is only written back when something changed.
    pub async fn check_and_update(&self, total_stamps: u32) -> MilestoneCheckResult {
        let mut milestones = self.load_milestones().await;
        let mut newly_achieved = Vec::new();
        let now = self.clock.now_iso8601();

        for milestone in milestones.iter_mut() {
            if !milestone.achieved && total_stamps >= milestone.count {
                milestone.achieved = true;
                milestone.achieved_at = Some(now.clone());
                newly_achieved.push(milestone.clone());
            }
        }

        if !newly_achieved.is_empty() {
            info!(
                "{} milestone(s) achieved at {} stamps",
                newly_achieved.len(),
                total_stamps
            );
            self.save_milestones(&milestones).await;
        }

        MilestoneCheckResult {
            milestones,
            newly_achieved,
        }
    }

    /// Append a blank milestone ten stamps past the last one
    pub async fn add_milestone(&self) -> Vec<Milestone> {
        let mut milestones = self.load_milestones().await;
        let milestone = next_milestone(&milestones, self.clock.now_millis());
        info!("Adding milestone {} at {} stamps", milestone.id, milestone.count);

        milestones.push(milestone);
        self.save_milestones(&milestones).await;
        milestones
    }

    pub async fn remove_milestone(&self, index: usize) -> Result<Vec<Milestone>, MilestoneEditError> {
        let mut milestones = self.load_milestones().await;
        if index >= milestones.len() {
            return Err(MilestoneEditError::IndexOutOfRange {
                index,
                len: milestones.len(),
            });
        }

        let removed = milestones.remove(index);
        info!("Removed milestone {}", removed.id);
        self.save_milestones(&milestones).await;
        Ok(milestones)
    }

    pub async fn update_milestone(
        &self,
        index: usize,
        update: MilestoneUpdate,
    ) -> Result<Vec<Milestone>, MilestoneEditError> {
        let mut milestones = self.load_milestones().await;
        let len = milestones.len();
        let Some(milestone) = milestones.get_mut(index) else {
            return Err(MilestoneEditError::IndexOutOfRange { index, len });
        };

        apply_update(milestone, update);
        self.save_milestones(&milestones).await;
        Ok(milestones)
    }
}
