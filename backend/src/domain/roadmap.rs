//! # Roadmap
//!
//! Projects the milestone list onto the lifetime total for the progress
//! roadmap screen: highest threshold at the top, the start at the bottom.
//!
//! ## Rules
//!
//! - Entries are listed in reverse stored order
//! - An entry is achieved when its milestone is flagged achieved or the total
//!   has reached its threshold
//! - The next target is the unachieved entry directly above an achieved one,
//!   or the bottom entry when nothing is achieved yet
//! - Only the next target carries a `remaining` count

use shared::{Milestone, RoadmapEntry};

use crate::domain::milestone_service::MilestoneService;
use crate::domain::stamp_card_service::StampCardService;

/// Service for building roadmap views
#[derive(Clone)]
pub struct RoadmapService {
    stamp_card_service: StampCardService,
    milestone_service: MilestoneService,
}

impl RoadmapService {
    pub fn new(stamp_card_service: StampCardService, milestone_service: MilestoneService) -> Self {
        Self {
            stamp_card_service,
            milestone_service,
        }
    }

    /// Roadmap for the stored milestones and the stored card's lifetime total
    pub async fn load_roadmap(&self) -> (u32, Vec<RoadmapEntry>) {
        let milestones = self.milestone_service.load_milestones().await;
        let total = self.stamp_card_service.load_card(None).await.lifetime_total();
        (total, Self::build_roadmap(&milestones, total))
    }

    pub fn build_roadmap(milestones: &[Milestone], total: u32) -> Vec<RoadmapEntry> {
        let reversed: Vec<&Milestone> = milestones.iter().rev().collect();
        let achieved: Vec<bool> = reversed
            .iter()
            .map(|m| m.achieved || total >= m.count)
            .collect();

        reversed
            .iter()
            .enumerate()
            .map(|(i, milestone)| {
                let below_reached = achieved.get(i + 1).copied().unwrap_or(true);
                let is_next_target = !achieved[i] && below_reached;
                RoadmapEntry {
                    milestone: (*milestone).clone(),
                    achieved: achieved[i],
                    is_next_target,
                    remaining: is_next_target.then(|| milestone.count.saturating_sub(total)),
                }
            })
            .collect()
    }

    /// The milestone currently being worked towards, if any
    pub fn next_target(milestones: &[Milestone], total: u32) -> Option<RoadmapEntry> {
        Self::build_roadmap(milestones, total)
            .into_iter()
            .find(|entry| entry.is_next_target)
    }
}
