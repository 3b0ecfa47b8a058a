use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest number of stamps a card can be configured to hold
pub const MIN_GOAL: u32 = 3;
/// Largest number of stamps a card can be configured to hold
pub const MAX_GOAL: u32 = 12;
/// Goal used when none is stored or the stored one is unusable
pub const DEFAULT_GOAL: u32 = 12;

/// The persisted stamp card.
///
/// Serialized with camelCase keys, which is also the on-disk format:
/// `{"stamps":[true,false],"completedCount":0,"totalEarnedStamps":1,"lastStampedAt":null}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampCard {
    /// One slot per stamp of the goal; filled in index order
    pub stamps: Vec<bool>,
    /// How many times the card has been completely filled
    pub completed_count: u32,
    /// Lifetime number of stamps earned, independent of card resets
    pub total_earned_stamps: u32,
    /// ISO-8601 timestamp of the most recent stamp
    pub last_stamped_at: Option<String>,
}

impl StampCard {
    /// An all-empty card for the given goal with zeroed statistics
    pub fn fresh(goal: u32) -> Self {
        Self::fresh_with_stats(goal, 0, 0)
    }

    /// An all-empty card for the given goal that keeps lifetime statistics
    pub fn fresh_with_stats(goal: u32, completed_count: u32, total_earned_stamps: u32) -> Self {
        Self {
            stamps: vec![false; goal as usize],
            completed_count,
            total_earned_stamps,
            last_stamped_at: None,
        }
    }

    /// Number of slots on the card
    pub fn goal(&self) -> u32 {
        self.stamps.len() as u32
    }

    pub fn filled_count(&self) -> u32 {
        self.stamps.iter().filter(|s| **s).count() as u32
    }

    pub fn remaining(&self) -> u32 {
        self.goal().saturating_sub(self.filled_count())
    }

    /// True when every slot is filled
    pub fn is_complete(&self) -> bool {
        self.stamps.iter().all(|s| *s)
    }

    /// Lowest-index empty slot, the one the next stamp goes into
    pub fn next_empty_index(&self) -> Option<usize> {
        self.stamps.iter().position(|s| !*s)
    }

    /// Highest-index filled slot, the one an undo clears
    pub fn last_filled_index(&self) -> Option<usize> {
        self.stamps.iter().rposition(|s| *s)
    }

    /// Lifetime total used for milestone evaluation
    pub fn lifetime_total(&self) -> u32 {
        self.total_earned_stamps
    }

    /// Slot view of the card for rendering
    pub fn slots(&self) -> Vec<StampSlot> {
        self.stamps
            .iter()
            .enumerate()
            .map(|(index, filled)| StampSlot {
                index,
                status: StampStatus::from(*filled),
            })
            .collect()
    }
}

/// Display status of a single slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampStatus {
    Filled,
    Empty,
}

impl From<bool> for StampStatus {
    fn from(filled: bool) -> Self {
        if filled {
            StampStatus::Filled
        } else {
            StampStatus::Empty
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampSlot {
    pub index: usize,
    pub status: StampStatus,
}

/// A reward unlocked once the lifetime total reaches `count`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Opaque identifier, e.g. "ms-1" or "ms-<epoch millis>"
    pub id: String,
    /// Cumulative stamp threshold
    pub count: u32,
    pub reward_name: String,
    pub reward_emoji: String,
    pub achieved: bool,
    /// ISO-8601 timestamp set when the milestone is first achieved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_at: Option<String>,
}

/// The milestone list seeded on first launch
pub fn default_milestones() -> Vec<Milestone> {
    vec![Milestone {
        id: "ms-1".to_string(),
        count: 10,
        reward_name: "お菓子を買う".to_string(),
        reward_emoji: "🍬".to_string(),
        achieved: false,
        achieved_at: None,
    }]
}

/// Emoji palette offered when editing a milestone reward
pub const EMOJI_OPTIONS: [&str; 18] = [
    "🍬", "🍦", "🍰", "🎂", "🍕", "🍩",
    "📚", "🎮", "🎬", "🎡", "⭐", "🎁",
    "🐶", "🐱", "🌟", "🏆", "🎯", "🚀",
];

/// Result of evaluating milestones against a lifetime total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneCheckResult {
    /// The full list after evaluation, in stored order
    pub milestones: Vec<Milestone>,
    /// Milestones achieved by this evaluation, in stored order
    pub newly_achieved: Vec<Milestone>,
}

/// Everything a frontend needs after a successful "add stamp"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampOutcome {
    pub card: StampCard,
    /// Index of the slot that was just filled
    pub filled_index: usize,
    /// True when this stamp completed the card
    pub card_completed: bool,
    pub milestones: Vec<Milestone>,
    pub newly_achieved: Vec<Milestone>,
}

/// One node of the progress roadmap, listed highest threshold first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapEntry {
    pub milestone: Milestone,
    pub achieved: bool,
    pub is_next_target: bool,
    /// Stamps still needed, only set for the next target
    pub remaining: Option<u32>,
}

/// Selectable stamp card themes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    #[default]
    Default,
    Animals,
    Vehicles,
    Space,
    Wagara,
}

/// Static presentation data for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeConfig {
    pub name: &'static str,
    pub emoji: &'static str,
    pub stamp_icon: &'static str,
    pub bg_colors: [&'static str; 2],
    pub primary_color: &'static str,
    pub card_bg: &'static str,
    pub free: bool,
    pub preview: Option<&'static str>,
    pub dark_mode: bool,
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 5] = [
        ThemeKey::Default,
        ThemeKey::Animals,
        ThemeKey::Vehicles,
        ThemeKey::Space,
        ThemeKey::Wagara,
    ];

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKey::Default => "default",
            ThemeKey::Animals => "animals",
            ThemeKey::Vehicles => "vehicles",
            ThemeKey::Space => "space",
            ThemeKey::Wagara => "wagara",
        }
    }

    pub fn config(&self) -> ThemeConfig {
        match self {
            ThemeKey::Default => ThemeConfig {
                name: "デフォルト",
                emoji: "⭐",
                stamp_icon: "⭐",
                bg_colors: ["#87CEEB", "#C8E6F5"],
                primary_color: "#FF6B35",
                card_bg: "#FFFFFF",
                free: true,
                preview: None,
                dark_mode: false,
            },
            ThemeKey::Animals => ThemeConfig {
                name: "どうぶつ",
                emoji: "🐾",
                stamp_icon: "🐾",
                bg_colors: ["#FFF8E1", "#FFE0B2"],
                primary_color: "#FF8F00",
                card_bg: "#FFFDE7",
                free: false,
                preview: Some("🐶🐱🐰🐸"),
                dark_mode: false,
            },
            ThemeKey::Vehicles => ThemeConfig {
                name: "のりもの",
                emoji: "🚗",
                stamp_icon: "🚗",
                bg_colors: ["#E3F2FD", "#BBDEFB"],
                primary_color: "#1976D2",
                card_bg: "#F8FBFF",
                free: false,
                preview: Some("🚗🚂✈️🚀"),
                dark_mode: false,
            },
            ThemeKey::Space => ThemeConfig {
                name: "うちゅう",
                emoji: "🚀",
                stamp_icon: "🌟",
                bg_colors: ["#1A1A2E", "#16213E"],
                primary_color: "#A855F7",
                card_bg: "#1E1E3A",
                free: false,
                preview: Some("🌟🚀🪐👾"),
                dark_mode: true,
            },
            ThemeKey::Wagara => ThemeConfig {
                name: "わがら",
                emoji: "🌸",
                stamp_icon: "🌸",
                bg_colors: ["#FFF0F5", "#FCE4EC"],
                primary_color: "#E91E8C",
                card_bg: "#FFF9FB",
                free: false,
                preview: Some("🌸⛩️🎋🍡"),
                dark_mode: false,
            },
        }
    }
}

/// Returned when a stored theme name matches no known theme
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}'")]
pub struct UnknownThemeError(pub String);

impl FromStr for ThemeKey {
    type Err = UnknownThemeError;

    /// Parse the storage representation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownThemeError(s.to_string()))
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features that sit behind the premium purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumFeature {
    Theme,
    CustomMilestones,
    Roadmap,
    AdFree,
}
