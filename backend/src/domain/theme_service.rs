use log::{error, info, warn};
use shared::{PremiumFeature, ThemeKey};
use std::sync::Arc;

use crate::domain::premium_service::PremiumService;
use crate::storage::{KeyValueStorage, PreferenceRepository};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("Theme '{0}' requires premium")]
    PremiumRequired(ThemeKey),
}

/// Service for the selected stamp card theme
#[derive(Clone)]
pub struct ThemeService {
    preference_repository: PreferenceRepository,
    premium_service: PremiumService,
}

impl ThemeService {
    pub fn new(storage: Arc<dyn KeyValueStorage>, premium_service: PremiumService) -> Self {
        Self {
            preference_repository: PreferenceRepository::new(storage),
            premium_service,
        }
    }

    /// Stored theme; unknown or missing values mean the default theme
    pub async fn load_theme(&self) -> ThemeKey {
        match self.preference_repository.get_theme().await {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|e| {
                warn!("{}, using default", e);
                ThemeKey::Default
            }),
            Ok(None) => ThemeKey::Default,
            Err(e) => {
                warn!("Failed to read theme: {}", e);
                ThemeKey::Default
            }
        }
    }

    /// Select a theme; locked themes need premium
    pub async fn select_theme(&self, theme: ThemeKey) -> Result<ThemeKey, ThemeError> {
        if !theme.config().free && !self.premium_service.is_unlocked(PremiumFeature::Theme).await {
            return Err(ThemeError::PremiumRequired(theme));
        }

        if let Err(e) = self.preference_repository.store_theme(theme.as_str()).await {
            error!("Failed to save theme {}: {}", theme, e);
        }
        info!("Selected theme {}", theme);
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::{PREMIUM_KEY, THEME_KEY};
    use crate::storage::test_utils::memory_storage;

    #[tokio::test]
    async fn test_default_theme() {
        let (raw, storage) = memory_storage();
        let service = ThemeService::new(storage.clone(), PremiumService::new(storage, None));

        assert_eq!(service.load_theme().await, ThemeKey::Default);

        raw.set(THEME_KEY, "neon").await.unwrap();
        assert_eq!(service.load_theme().await, ThemeKey::Default);
    }

    #[tokio::test]
    async fn test_locked_theme_requires_premium() {
        let (raw, storage) = memory_storage();
        let service = ThemeService::new(storage.clone(), PremiumService::new(storage, None));

        assert_eq!(
            service.select_theme(ThemeKey::Space).await,
            Err(ThemeError::PremiumRequired(ThemeKey::Space))
        );
        assert_eq!(service.load_theme().await, ThemeKey::Default);

        raw.set(PREMIUM_KEY, "true").await.unwrap();
        assert_eq!(service.select_theme(ThemeKey::Space).await, Ok(ThemeKey::Space));
        assert_eq!(service.load_theme().await, ThemeKey::Space);
    }

    #[tokio::test]
    async fn test_free_theme_always_selectable() {
        let (_raw, storage) = memory_storage();
        let service = ThemeService::new(storage.clone(), PremiumService::new(storage, None));

        assert_eq!(service.select_theme(ThemeKey::Default).await, Ok(ThemeKey::Default));
    }
}
