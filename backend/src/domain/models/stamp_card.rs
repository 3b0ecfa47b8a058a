//! Parsing of the persisted stamp card.
//!
//! A stored card is untrusted JSON. [`parse_card`] classifies it against the
//! current goal:
//!
//! - [`ParsedCard::Valid`]: the record matches the goal and can be used as is
//! - [`ParsedCard::Migratable`]: the record has an all-boolean `stamps` array
//!   but is otherwise off (usually a different length after a goal change);
//!   its progress can be carried over
//! - [`ParsedCard::Invalid`]: nothing worth keeping
//!
//! Older records have no `totalEarnedStamps`. For those the lifetime total is
//! derived as `completedCount * stamps.len() + filled`, except that a full
//! card is already included in `completedCount` and is not counted twice.

use serde_json::{Map, Value};
use shared::{StampCard, MAX_GOAL, MIN_GOAL};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardValidationError {
    #[error("stored card is not a JSON object")]
    NotAnObject,
    #[error("stored card has no stamps array")]
    MissingStamps,
    #[error("stamp at index {0} is not a boolean")]
    NonBooleanStamp(usize),
    #[error("card has {found} stamps but the goal is {expected}")]
    LengthMismatch { expected: u32, found: usize },
    #[error("completedCount is missing or not a non-negative integer")]
    InvalidCompletedCount,
    #[error("totalEarnedStamps is not a non-negative integer")]
    InvalidTotalEarnedStamps,
    #[error("lastStampedAt must be null or a string")]
    InvalidLastStampedAt,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoalValidationError {
    #[error("Goal must be between {min} and {max}, got {goal}")]
    OutOfRange { goal: u32, min: u32, max: u32 },
}

pub fn is_valid_goal(goal: u32) -> bool {
    (MIN_GOAL..=MAX_GOAL).contains(&goal)
}

pub fn validate_goal(goal: u32) -> Result<u32, GoalValidationError> {
    if is_valid_goal(goal) {
        Ok(goal)
    } else {
        Err(GoalValidationError::OutOfRange {
            goal,
            min: MIN_GOAL,
            max: MAX_GOAL,
        })
    }
}

/// Whatever could be salvaged from a record that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyCard {
    pub stamps: Vec<bool>,
    pub completed_count: Option<u32>,
    pub total_earned_stamps: Option<u32>,
    pub last_stamped_at: Option<String>,
    /// Why the record was not accepted as is
    pub reason: CardValidationError,
}

impl LegacyCard {
    /// Carry the record over to a card of `goal` slots
    ///
    /// Slot `i` keeps its old value when it existed, otherwise starts empty.
    /// Statistics are preserved, defaulting to zero / null when missing.
    pub fn migrate(self, goal: u32) -> StampCard {
        let completed_count = self.completed_count.unwrap_or(0);
        let total_earned_stamps = self
            .total_earned_stamps
            .unwrap_or_else(|| derive_total_earned(completed_count, &self.stamps));

        let stamps = (0..goal as usize)
            .map(|i| self.stamps.get(i).copied().unwrap_or(false))
            .collect();

        StampCard {
            stamps,
            completed_count,
            total_earned_stamps,
            last_stamped_at: self.last_stamped_at,
        }
    }
}

/// Outcome of validating a stored card against a goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCard {
    /// `derived_total` is set when `totalEarnedStamps` was missing and had to be computed
    Valid { card: StampCard, derived_total: bool },
    Migratable(LegacyCard),
    Invalid(CardValidationError),
}

/// Lifetime total for records written before it was tracked
pub fn derive_total_earned(completed_count: u32, stamps: &[bool]) -> u32 {
    let len = stamps.len() as u32;
    let filled = stamps.iter().filter(|s| **s).count() as u32;

    // A full card was counted in completedCount when its last slot was filled
    let earlier_cards = if len > 0 && filled == len && completed_count > 0 {
        completed_count - 1
    } else {
        completed_count
    };
    earlier_cards.saturating_mul(len).saturating_add(filled)
}

fn read_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn read_stamps(obj: &Map<String, Value>) -> Result<Vec<bool>, CardValidationError> {
    let Some(Value::Array(items)) = obj.get("stamps") else {
        return Err(CardValidationError::MissingStamps);
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item.as_bool().ok_or(CardValidationError::NonBooleanStamp(i)))
        .collect()
}

/// Validate a stored card document against `goal`
pub fn parse_card(value: &Value, goal: u32) -> ParsedCard {
    let Some(obj) = value.as_object() else {
        return ParsedCard::Invalid(CardValidationError::NotAnObject);
    };

    let stamps = match read_stamps(obj) {
        Ok(stamps) => stamps,
        Err(reason) => return ParsedCard::Invalid(reason),
    };

    let completed_count = obj.get("completedCount").and_then(read_u32);

    // Absent is fine (older record); present but malformed is not
    let (total_earned_stamps, total_ok) = match obj.get("totalEarnedStamps") {
        None | Some(Value::Null) => (None, true),
        Some(v) => match read_u32(v) {
            Some(n) => (Some(n), true),
            None => (None, false),
        },
    };

    // Must be present and null, or a string
    let (last_stamped_at, last_ok) = match obj.get("lastStampedAt") {
        Some(Value::Null) => (None, true),
        Some(Value::String(s)) => (Some(s.clone()), true),
        _ => (None, false),
    };

    let reason = if stamps.len() != goal as usize {
        Some(CardValidationError::LengthMismatch {
            expected: goal,
            found: stamps.len(),
        })
    } else if completed_count.is_none() {
        Some(CardValidationError::InvalidCompletedCount)
    } else if !total_ok {
        Some(CardValidationError::InvalidTotalEarnedStamps)
    } else if !last_ok {
        Some(CardValidationError::InvalidLastStampedAt)
    } else {
        None
    };

    match (reason, completed_count) {
        (None, Some(completed_count)) => {
            let derived_total = total_earned_stamps.is_none();
            let total_earned_stamps = total_earned_stamps
                .unwrap_or_else(|| derive_total_earned(completed_count, &stamps));
            ParsedCard::Valid {
                card: StampCard {
                    stamps,
                    completed_count,
                    total_earned_stamps,
                    last_stamped_at,
                },
                derived_total,
            }
        }
        (reason, _) => ParsedCard::Migratable(LegacyCard {
            stamps,
            completed_count,
            total_earned_stamps,
            last_stamped_at,
            reason: reason.unwrap_or(CardValidationError::InvalidCompletedCount),
        }),
    }
}
