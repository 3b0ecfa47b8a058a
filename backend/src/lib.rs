//! # Stamp Card Backend
//!
//! Contains all non-UI logic for the stamp card app.
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (any frontend)
//!     ↓
//! Domain Layer (stamp card, milestones, themes, premium)
//!     ↓
//! Storage Layer (key-value store: files or memory)
//! ```
//!
//! Frontends build an [`AppState`] once at startup and call the services on it.

pub mod domain;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

pub use domain::*;
pub use storage::*;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub stamp_card_service: StampCardService,
    pub milestone_service: MilestoneService,
    pub roadmap_service: RoadmapService,
    pub stamp_flow_service: StampFlowService,
    pub theme_service: ThemeService,
    pub premium_service: PremiumService,
    pub review_prompt_service: ReviewPromptService,
}

impl AppState {
    /// Wire every service over one storage backend
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        purchase_provider: Option<Arc<dyn PurchaseProvider>>,
    ) -> Self {
        let stamp_card_service = StampCardService::new(storage.clone(), clock.clone());
        let milestone_service = MilestoneService::new(storage.clone(), clock);
        let premium_service = PremiumService::new(storage.clone(), purchase_provider);

        Self {
            roadmap_service: RoadmapService::new(stamp_card_service.clone(), milestone_service.clone()),
            stamp_flow_service: StampFlowService::new(
                stamp_card_service.clone(),
                milestone_service.clone(),
            ),
            theme_service: ThemeService::new(storage.clone(), premium_service.clone()),
            review_prompt_service: ReviewPromptService::new(storage),
            stamp_card_service,
            milestone_service,
            premium_service,
        }
    }
}

/// Initialize the backend in the default data directory
pub fn initialize_backend() -> Result<AppState> {
    info!("Setting up data directory");
    let connection = FileConnection::new_default()?;
    initialize_with_connection(connection)
}

/// Initialize the backend with its data in `data_directory`
pub fn initialize_backend_at<P: AsRef<Path>>(data_directory: P) -> Result<AppState> {
    let connection = FileConnection::new(data_directory)?;
    initialize_with_connection(connection)
}

fn initialize_with_connection(connection: FileConnection) -> Result<AppState> {
    let config = ConfigRepository::new(connection.clone()).load_or_create()?;
    info!(
        "Using data directory {} (format {})",
        connection.base_directory().display(),
        config.data_format_version
    );

    info!("Setting up domain model");
    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(connection));
    Ok(AppState::new(storage, Arc::new(SystemClock), None))
}
