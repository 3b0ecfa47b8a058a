use shared::Milestone;

use crate::domain::commands::milestone::MilestoneUpdate;

/// Gap between a newly added milestone and the last one in the list
pub const MILESTONE_STEP: u32 = 10;
/// Emoji given to a newly added milestone
pub const NEW_MILESTONE_EMOJI: &str = "🎁";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MilestoneEditError {
    #[error("No milestone at index {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

pub fn generate_milestone_id(now_millis: i64) -> String {
    format!("ms-{}", now_millis)
}

/// The milestone appended by "add milestone": ten past the last one in the list
pub fn next_milestone(existing: &[Milestone], now_millis: i64) -> Milestone {
    let count = existing
        .last()
        .map(|last| last.count.saturating_add(MILESTONE_STEP))
        .unwrap_or(MILESTONE_STEP);

    Milestone {
        id: generate_milestone_id(now_millis),
        count,
        reward_name: String::new(),
        reward_emoji: NEW_MILESTONE_EMOJI.to_string(),
        achieved: false,
        achieved_at: None,
    }
}

/// Apply an edit; achievement state is never touched here
pub fn apply_update(milestone: &mut Milestone, update: MilestoneUpdate) {
    if let Some(count) = update.count {
        milestone.count = count;
    }
    if let Some(name) = update.reward_name {
        milestone.reward_name = name;
    }
    if let Some(emoji) = update.reward_emoji {
        milestone.reward_emoji = emoji;
    }
}
