//! # Domain Module
//!
//! Contains all business logic for the stamp card app.
//!
//! This module owns the rules for how a stamp card fills up, how lifetime
//! statistics accumulate, and when milestone rewards are earned. It works
//! against the [`KeyValueStorage`](crate::storage::KeyValueStorage) trait and
//! knows nothing about the UI or the concrete storage backend.
//!
//! ## Module Organization
//!
//! - **stamp_card_service**: goal and card persistence, stamping, resets
//! - **milestone_service**: milestone list, achievement checks and edits
//! - **roadmap**: display ordering of milestones and the next target
//! - **stamp_flow_service**: stamp-then-check-milestones orchestration
//! - **theme_service**: stamp card theme selection
//! - **premium_service**: premium purchase and feature gating
//! - **review_prompt_service**: launch counting for the review prompt
//! - **models**: validation and migration of stored records
//!
//! ## Business Rules
//!
//! - The goal is always within 3..=12 stamps
//! - A card is complete when every slot is stamped; the next stamp needs a new card
//! - Achieved milestones never revert
//! - Service operations never fail because of storage; they log and fall back

pub mod clock;
pub mod commands;
pub mod milestone_service;
pub mod models;
pub mod premium_service;
pub mod review_prompt_service;
pub mod roadmap;
pub mod stamp_card_service;
pub mod stamp_flow_service;
pub mod theme_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use milestone_service::MilestoneService;
pub use premium_service::{PremiumService, PurchaseOutcome, PurchaseProvider};
pub use review_prompt_service::ReviewPromptService;
pub use roadmap::RoadmapService;
pub use stamp_card_service::StampCardService;
pub use stamp_flow_service::StampFlowService;
pub use theme_service::{ThemeError, ThemeService};
