//! Repositories map domain records onto storage keys.
//!
//! Each repository owns the key names and the (de)serialization for its
//! records; none of them apply business rules or fall back to defaults.

pub mod milestone_repository;
pub mod preference_repository;
pub mod stamp_card_repository;

pub use milestone_repository::MilestoneRepository;
pub use preference_repository::PreferenceRepository;
pub use stamp_card_repository::StampCardRepository;

/// Key under which the stamp card JSON is stored
pub const STAMP_CARD_KEY: &str = "stamp_card";
/// Key under which the goal is stored as a stringified integer
pub const GOAL_KEY: &str = "totalGoal";
/// Key under which the milestone list JSON is stored
pub const MILESTONES_KEY: &str = "milestones";
/// Key under which the selected theme is stored
pub const THEME_KEY: &str = "theme";
/// Key under which the premium flag is cached
pub const PREMIUM_KEY: &str = "isPremium";
pub const LAUNCH_COUNT_KEY: &str = "app_launch_count";
pub const REVIEWED_KEY: &str = "app_reviewed";
