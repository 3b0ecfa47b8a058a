//! Stamp card service domain logic.
//!
//! Owns the single persisted stamp card and the goal (stamps per card).
//!
//! ## Key Responsibilities
//!
//! - **Goal**: reading and writing the configured goal with range fallback
//! - **Card loading**: validating the stored card and migrating it when the
//!   goal changed
//! - **Stamping**: add (lowest empty slot) and undo (highest filled slot)
//! - **Resets**: new card cycle, total reset, full wipe
//!
//! ## Business Rules
//!
//! - The card always has exactly `goal` slots
//! - `completed_count` goes up by one only on the stamp that fills the card
//! - `total_earned_stamps` goes up by one per stamp and only the total reset
//!   brings it down
//! - Operations never fail: storage problems are logged and fall back to
//!   defaults

use log::{debug, error, info, warn};
use shared::{StampCard, DEFAULT_GOAL};
use std::sync::Arc;

use crate::domain::clock::Clock;
use crate::domain::models::stamp_card::{
    is_valid_goal, parse_card, validate_goal, GoalValidationError, ParsedCard,
};
use crate::storage::{KeyValueStorage, StampCardRepository};

/// Service for the stamp card record and goal configuration
#[derive(Clone)]
pub struct StampCardService {
    stamp_card_repository: StampCardRepository,
    clock: Arc<dyn Clock>,
}

impl StampCardService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            stamp_card_repository: StampCardRepository::new(storage),
            clock,
        }
    }

    /// Stored goal, or the default when it is missing, unparseable or out of range
    pub async fn load_goal(&self) -> u32 {
        match self.stamp_card_repository.get_goal().await {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(goal) if is_valid_goal(goal) => goal,
                _ => {
                    warn!("Ignoring stored goal '{}', using default {}", raw, DEFAULT_GOAL);
                    DEFAULT_GOAL
                }
            },
            Ok(None) => DEFAULT_GOAL,
            Err(e) => {
                warn!("Failed to read goal: {}. Using default {}.", e, DEFAULT_GOAL);
                DEFAULT_GOAL
            }
        }
    }

    /// Persist the goal as given; the card is migrated on the next load
    pub async fn save_goal(&self, goal: u32) {
        if let Err(e) = self.stamp_card_repository.store_goal(goal).await {
            error!("Failed to save goal {}: {}", goal, e);
        }
    }

    /// Validate and save a new goal, then load the card migrated to it
    pub async fn change_goal(&self, goal: u32) -> Result<StampCard, GoalValidationError> {
        let goal = validate_goal(goal)?;
        info!("Changing goal to {}", goal);
        self.save_goal(goal).await;
        Ok(self.load_card(Some(goal)).await)
    }

    /// Load the card for `goal` (or the stored goal)
    ///
    /// A record whose stamps are all booleans but whose shape doesn't match
    /// the goal is migrated and saved right away. Anything else that fails
    /// validation yields a fresh card. An out-of-range `goal` is ignored in
    /// favour of the stored one.
    pub async fn load_card(&self, goal: Option<u32>) -> StampCard {
        let goal = match goal {
            Some(goal) if is_valid_goal(goal) => goal,
            Some(goal) => {
                warn!("Ignoring out-of-range goal {} when loading the card", goal);
                self.load_goal().await
            }
            None => self.load_goal().await,
        };

        let document = match self.stamp_card_repository.get_card_document().await {
            Ok(Some(document)) => document,
            Ok(None) => {
                debug!("No stored stamp card, starting fresh with goal {}", goal);
                return StampCard::fresh(goal);
            }
            Err(e) => {
                warn!("Failed to read stamp card: {}. Starting fresh.", e);
                return StampCard::fresh(goal);
            }
        };

        match parse_card(&document, goal) {
            ParsedCard::Valid {
                card,
                derived_total: false,
            } => card,
            ParsedCard::Valid {
                card,
                derived_total: true,
            } => {
                info!("Filled in lifetime total {} for stored card", card.total_earned_stamps);
                self.save_card(&card).await;
                card
            }
            ParsedCard::Migratable(legacy) => {
                info!("Migrating stored stamp card to goal {} ({})", goal, legacy.reason);
                let migrated = legacy.migrate(goal);
                self.save_card(&migrated).await;
                migrated
            }
            ParsedCard::Invalid(reason) => {
                warn!("Discarding stored stamp card: {}", reason);
                StampCard::fresh(goal)
            }
        }
    }

    /// Persist the card verbatim
    pub async fn save_card(&self, card: &StampCard) {
        if let Err(e) = self.stamp_card_repository.store_card(card).await {
            error!("Failed to save stamp card: {}", e);
        }
    }

    /// Fill the lowest empty slot
    ///
    /// Returns `None` without touching storage when the card is already full.
    pub async fn add_stamp(&self, card: &StampCard) -> Option<StampCard> {
        let Some(index) = card.next_empty_index() else {
            debug!("Card is full, not adding a stamp");
            return None;
        };

        let mut updated = card.clone();
        updated.stamps[index] = true;
        if updated.is_complete() {
            updated.completed_count = card.completed_count.saturating_add(1);
            info!("Card completed ({} total)", updated.completed_count);
        }
        updated.total_earned_stamps = card.total_earned_stamps.saturating_add(1);
        updated.last_stamped_at = Some(self.clock.now_iso8601());

        self.save_card(&updated).await;
        Some(updated)
    }

    /// Clear the highest filled slot
    ///
    /// Returns `None` without touching storage when nothing is filled.
    /// Statistics and `last_stamped_at` are left alone.
    pub async fn remove_stamp(&self, card: &StampCard) -> Option<StampCard> {
        let Some(index) = card.last_filled_index() else {
            debug!("Card is empty, nothing to undo");
            return None;
        };

        let mut updated = card.clone();
        updated.stamps[index] = false;

        self.save_card(&updated).await;
        Some(updated)
    }

    /// Start a new card cycle, keeping lifetime statistics
    pub async fn reset_stamp_card(&self) -> StampCard {
        let goal = self.load_goal().await;
        let current = self.load_card(Some(goal)).await;
        let fresh =
            StampCard::fresh_with_stats(goal, current.completed_count, current.total_earned_stamps);

        info!("Reset stamp card (goal {})", goal);
        self.save_card(&fresh).await;
        fresh
    }

    /// New card cycle with completion count and lifetime total zeroed
    pub async fn reset_total(&self) -> StampCard {
        let mut zeroed = self.reset_stamp_card().await;
        zeroed.completed_count = 0;
        zeroed.total_earned_stamps = 0;

        info!("Reset lifetime totals");
        self.save_card(&zeroed).await;
        zeroed
    }

    /// Replace the card with a completely fresh one
    pub async fn clear_all_data(&self) -> StampCard {
        let goal = self.load_goal().await;
        let fresh = StampCard::fresh(goal);

        info!("Cleared all stamp card data (goal {})", goal);
        self.save_card(&fresh).await;
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::repositories::{GOAL_KEY, STAMP_CARD_KEY};
    use crate::storage::test_utils::{init_test_logging, memory_storage, FailingStorage, TestEnvironment};
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};

    fn create_test_service() -> (MemoryStorage, StampCardService) {
        init_test_logging();
        let (raw, storage) = memory_storage();
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()));
        (raw, StampCardService::new(storage, clock))
    }

    fn partial_card(goal: u32, filled: usize) -> StampCard {
        StampCard {
            stamps: (0..goal as usize).map(|i| i < filled).collect(),
            completed_count: 0,
            total_earned_stamps: filled as u32,
            last_stamped_at: None,
        }
    }

    async fn stored_card(raw: &MemoryStorage) -> Option<String> {
        raw.get(STAMP_CARD_KEY).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_goal_defaults() {
        let (raw, service) = create_test_service();
        assert_eq!(service.load_goal().await, 12);

        for bad in ["2", "13", "abc", "-5", ""] {
            raw.set(GOAL_KEY, bad).await.unwrap();
            assert_eq!(service.load_goal().await, 12, "stored goal {:?}", bad);
        }

        raw.set(GOAL_KEY, "7").await.unwrap();
        assert_eq!(service.load_goal().await, 7);
    }

    #[tokio::test]
    async fn test_card_length_matches_every_goal() {
        let (_raw, service) = create_test_service();
        for goal in 3..=12 {
            assert_eq!(service.load_card(Some(goal)).await.stamps.len(), goal as usize);
        }
    }

    #[tokio::test]
    async fn test_load_card_returns_saved_card() {
        let (_raw, service) = create_test_service();
        let mut card = partial_card(12, 2);
        card.completed_count = 3;
        card.total_earned_stamps = 38;
        card.last_stamped_at = Some("2024-01-01T00:00:00.000Z".to_string());

        service.save_card(&card).await;

        assert_eq!(service.load_card(None).await, card);
    }

    #[tokio::test]
    async fn test_load_card_falls_back_on_invalid_json() {
        let (raw, service) = create_test_service();
        raw.set(STAMP_CARD_KEY, "not-json").await.unwrap();

        assert_eq!(service.load_card(None).await, StampCard::fresh(12));
    }

    #[tokio::test]
    async fn test_load_card_discards_non_boolean_stamps() {
        let (raw, service) = create_test_service();
        raw.set(STAMP_CARD_KEY, r#"{"stamps":[1,2,3]}"#).await.unwrap();

        assert_eq!(service.load_card(None).await, StampCard::fresh(12));
    }

    #[tokio::test]
    async fn test_derived_total_is_persisted() {
        let (raw, service) = create_test_service();
        service.save_goal(3).await;
        raw.set(
            STAMP_CARD_KEY,
            r#"{"stamps":[true,true,true],"completedCount":1,"lastStampedAt":null}"#,
        )
        .await
        .unwrap();

        let card = service.load_card(None).await;
        assert_eq!(card.total_earned_stamps, 3);

        let stored: serde_json::Value = serde_json::from_str(&stored_card(&raw).await.unwrap()).unwrap();
        assert_eq!(stored["totalEarnedStamps"], 3);
    }

    #[tokio::test]
    async fn test_load_card_ignores_out_of_range_goal() {
        let (raw, service) = create_test_service();
        service.save_goal(4).await;
        let card = partial_card(4, 2);
        service.save_card(&card).await;
        let before = stored_card(&raw).await;

        for goal in [0, 2, 13, u32::MAX] {
            assert_eq!(service.load_card(Some(goal)).await, card, "goal {}", goal);
        }
        assert_eq!(stored_card(&raw).await, before);
    }

    #[tokio::test]
    async fn test_goal_change_migrates_card() {
        let (raw, service) = create_test_service();
        service.save_goal(10).await;
        let mut card = partial_card(10, 2);
        card.completed_count = 4;
        service.save_card(&card).await;

        let migrated = service.change_goal(6).await.unwrap();

        assert_eq!(migrated.stamps, vec![true, true, false, false, false, false]);
        assert_eq!(migrated.completed_count, 4);
        assert_eq!(service.load_goal().await, 6);

        // Migration is persisted immediately
        let stored: StampCard = serde_json::from_str(&stored_card(&raw).await.unwrap()).unwrap();
        assert_eq!(stored, migrated);
    }

    #[tokio::test]
    async fn test_change_goal_rejects_out_of_range() {
        let (_raw, service) = create_test_service();
        assert!(service.change_goal(2).await.is_err());
        assert!(service.change_goal(13).await.is_err());
        assert_eq!(service.load_goal().await, 12);
    }

    #[tokio::test]
    async fn test_add_stamp_fills_in_order() {
        let (_raw, service) = create_test_service();
        let mut card = service.load_card(Some(5)).await;

        for expected in 0..5 {
            card = service.add_stamp(&card).await.unwrap();
            assert_eq!(card.last_filled_index(), Some(expected));
            assert_eq!(card.filled_count(), expected as u32 + 1);
        }
        assert_eq!(card.total_earned_stamps, 5);
        assert_eq!(card.last_stamped_at.as_deref(), Some("2024-06-01T09:30:00.000Z"));
    }

    #[tokio::test]
    async fn test_add_stamp_counts_completion_once() {
        let (_raw, service) = create_test_service();
        let mut card = partial_card(10, 9);
        card.completed_count = 2;

        let updated = service.add_stamp(&card).await.unwrap();
        assert!(updated.is_complete());
        assert_eq!(updated.completed_count, 3);

        let mut card = partial_card(10, 5);
        card.completed_count = 1;
        let updated = service.add_stamp(&card).await.unwrap();
        assert_eq!(updated.completed_count, 1);
    }

    #[tokio::test]
    async fn test_add_stamp_on_full_card_is_noop() {
        let (raw, service) = create_test_service();
        let full = partial_card(4, 4);
        service.save_card(&full).await;
        let before = stored_card(&raw).await;

        assert!(service.add_stamp(&full).await.is_none());
        assert_eq!(stored_card(&raw).await, before);
    }

    #[tokio::test]
    async fn test_add_stamp_persists() {
        let (_raw, service) = create_test_service();
        let card = service.load_card(None).await;

        service.add_stamp(&card).await.unwrap();

        let loaded = service.load_card(None).await;
        assert!(loaded.stamps[0]);
        assert_eq!(loaded.total_earned_stamps, 1);
    }

    #[tokio::test]
    async fn test_remove_stamp_clears_highest_filled() {
        let (_raw, service) = create_test_service();
        let mut card = partial_card(6, 3);
        card.completed_count = 2;
        card.last_stamped_at = Some("2024-02-02T00:00:00.000Z".to_string());

        let updated = service.remove_stamp(&card).await.unwrap();

        assert_eq!(updated.stamps, vec![true, true, false, false, false, false]);
        assert_eq!(updated.completed_count, 2);
        assert_eq!(updated.total_earned_stamps, 3);
        assert_eq!(updated.last_stamped_at, card.last_stamped_at);
    }

    #[tokio::test]
    async fn test_remove_stamp_on_empty_card_is_noop() {
        let (raw, service) = create_test_service();
        let empty = StampCard::fresh(12);

        assert!(service.remove_stamp(&empty).await.is_none());
        assert_eq!(stored_card(&raw).await, None);
    }

    #[tokio::test]
    async fn test_reset_keeps_statistics() {
        let (_raw, service) = create_test_service();
        let mut card = partial_card(12, 5);
        card.completed_count = 3;
        card.total_earned_stamps = 41;
        card.last_stamped_at = Some("2024-01-01T00:00:00.000Z".to_string());
        service.save_card(&card).await;

        let fresh = service.reset_stamp_card().await;

        assert_eq!(fresh.filled_count(), 0);
        assert_eq!(fresh.completed_count, 3);
        assert_eq!(fresh.total_earned_stamps, 41);
        assert_eq!(fresh.last_stamped_at, None);
        assert_eq!(service.load_card(None).await, fresh);
    }

    #[tokio::test]
    async fn test_reset_total_zeroes_statistics() {
        let (_raw, service) = create_test_service();
        let mut card = partial_card(12, 5);
        card.completed_count = 3;
        card.total_earned_stamps = 41;
        service.save_card(&card).await;

        let zeroed = service.reset_total().await;

        assert_eq!(zeroed, StampCard::fresh(12));
        assert_eq!(service.load_card(None).await.completed_count, 0);
    }

    #[tokio::test]
    async fn test_clear_all_data() {
        let (_raw, service) = create_test_service();
        service.save_goal(8).await;
        let mut card = partial_card(8, 8);
        card.completed_count = 5;
        service.save_card(&card).await;

        let fresh = service.clear_all_data().await;

        assert_eq!(fresh, StampCard::fresh(8));
        assert_eq!(service.load_card(None).await.completed_count, 0);
    }

    #[tokio::test]
    async fn test_storage_failures_never_surface() {
        init_test_logging();
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        let service = StampCardService::new(Arc::new(FailingStorage), clock);

        assert_eq!(service.load_goal().await, 12);
        let card = service.load_card(None).await;
        assert_eq!(card, StampCard::fresh(12));

        let updated = service.add_stamp(&card).await.unwrap();
        assert!(updated.stamps[0]);
        assert_eq!(service.reset_stamp_card().await, StampCard::fresh(12));
    }

    #[tokio::test]
    async fn test_file_backed_card_survives_restart() -> anyhow::Result<()> {
        let env = TestEnvironment::new().await?;
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));

        let service = StampCardService::new(env.file_storage(), clock.clone());
        service.change_goal(4).await?;
        let card = service.load_card(None).await;
        service.add_stamp(&card).await.unwrap();

        let restarted = StampCardService::new(env.file_storage(), clock);
        let loaded = restarted.load_card(None).await;
        assert_eq!(loaded.stamps, vec![true, false, false, false]);
        Ok(())
    }
}
