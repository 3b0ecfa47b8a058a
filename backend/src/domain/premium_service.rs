//! Premium purchase gate.
//!
//! The purchase SDK is injected as a [`PurchaseProvider`]; when none is
//! available (development builds, platforms without in-app purchases) the
//! app simply stays on the free tier. The unlocked state is cached under
//! the `isPremium` key so it is known at startup before the store answers.

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use shared::PremiumFeature;
use std::sync::Arc;

use crate::storage::{KeyValueStorage, PreferenceRepository};

/// Store product that unlocks premium
pub const PREMIUM_PRODUCT_ID: &str = "com.zerocode.myapp.premium";
/// Price shown until the store reports a localized one
pub const DEFAULT_PRICE: &str = "¥100";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased,
    Cancelled,
    /// Awaiting external approval; not unlocked yet
    Pending,
}

/// In-app purchase capability
#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    /// Localized price for a product, if the store knows it
    async fn localized_price(&self, product_id: &str) -> Result<Option<String>>;

    /// Product ids the user already owns
    async fn owned_products(&self) -> Result<Vec<String>>;

    async fn purchase(&self, product_id: &str) -> Result<PurchaseOutcome>;
}

#[derive(Clone)]
pub struct PremiumService {
    preference_repository: PreferenceRepository,
    provider: Option<Arc<dyn PurchaseProvider>>,
}

impl PremiumService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, provider: Option<Arc<dyn PurchaseProvider>>) -> Self {
        Self {
            preference_repository: PreferenceRepository::new(storage),
            provider,
        }
    }

    /// Cached premium state
    pub async fn is_premium(&self) -> bool {
        match self.preference_repository.get_premium_flag().await {
            Ok(flag) => flag,
            Err(e) => {
                warn!("Failed to read premium flag: {}", e);
                false
            }
        }
    }

    /// Every premium feature is unlocked by the same purchase
    pub async fn is_unlocked(&self, feature: PremiumFeature) -> bool {
        let unlocked = self.is_premium().await;
        if !unlocked {
            info!("Feature {:?} requires premium", feature);
        }
        unlocked
    }

    pub async fn price(&self) -> String {
        let Some(provider) = &self.provider else {
            return DEFAULT_PRICE.to_string();
        };
        match provider.localized_price(PREMIUM_PRODUCT_ID).await {
            Ok(Some(price)) => price,
            Ok(None) => DEFAULT_PRICE.to_string(),
            Err(e) => {
                warn!("Failed to fetch price: {}", e);
                DEFAULT_PRICE.to_string()
            }
        }
    }

    /// Ask the store whether premium was bought before; caches a positive answer
    pub async fn restore_purchases(&self) -> bool {
        let Some(provider) = &self.provider else {
            return self.is_premium().await;
        };

        match provider.owned_products().await {
            Ok(products) if products.iter().any(|p| p == PREMIUM_PRODUCT_ID) => {
                info!("Restored premium purchase");
                self.cache_premium().await;
                true
            }
            Ok(_) => self.is_premium().await,
            Err(e) => {
                warn!("Restore failed: {}", e);
                self.is_premium().await
            }
        }
    }

    /// Buy premium; true once the purchase is completed
    pub async fn purchase_premium(&self) -> bool {
        let Some(provider) = &self.provider else {
            warn!("No purchase provider available");
            return false;
        };

        match provider.purchase(PREMIUM_PRODUCT_ID).await {
            Ok(PurchaseOutcome::Purchased) => {
                info!("Premium purchased");
                self.cache_premium().await;
                true
            }
            Ok(outcome) => {
                info!("Premium purchase not completed: {:?}", outcome);
                false
            }
            Err(e) => {
                warn!("Purchase error: {}", e);
                false
            }
        }
    }

    async fn cache_premium(&self) {
        if let Err(e) = self.preference_repository.store_premium_flag().await {
            error!("Failed to cache premium flag: {}", e);
        }
    }
}
