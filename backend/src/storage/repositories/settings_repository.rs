//! # Settings Repository
//!
//! Stores the settings object as JSON under [`SETTINGS_KEY`]. Partial objects
//! are completed with defaults; anything unreadable yields the defaults.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared::Settings as SharedSettings;
use tracing::{debug, error, warn};

use crate::domain::models::settings::Settings;
use crate::io::rest::mappers::settings_mapper::SettingsMapper;
use crate::storage::traits::KeyValueStorage;

/// Key holding the settings object
pub const SETTINGS_KEY: &str = "blood_donor_settings_v1";

#[derive(Clone)]
pub struct SettingsRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl SettingsRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load settings, falling back to defaults
    pub async fn load_settings(&self) -> Settings {
        let raw = match self.storage.get_value(SETTINGS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored settings, using defaults");
                return Settings::default();
            }
            Err(e) => {
                error!("Failed to read stored settings, using defaults: {:#}", e);
                return Settings::default();
            }
        };

        match serde_json::from_str::<SharedSettings>(&raw) {
            Ok(dto) => SettingsMapper::to_domain(dto),
            Err(e) => {
                warn!("Stored settings are malformed, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(&SettingsMapper::to_dto(settings.clone()))
            .context("Failed to serialize settings")?;

        self.storage.put_value(SETTINGS_KEY, &json).await?;
        debug!("Saved settings: {:?}", settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;
    use shared::Theme;

    async fn setup_test() -> (DbConnection, SettingsRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = SettingsRepository::new(Arc::new(db.clone()));
        (db, repo)
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let (_db, repo) = setup_test().await;
        assert_eq!(repo.load_settings().await, Settings::default());
    }

    #[tokio::test]
    async fn test_partial_object_is_completed() {
        let (db, repo) = setup_test().await;

        db.put_value(SETTINGS_KEY, r#"{"donationIntervalDays": 120}"#).await.unwrap();

        let settings = repo.load_settings().await;
        assert_eq!(settings.donation_interval_days, 120);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.locale, "bn");
    }

    #[tokio::test]
    async fn test_malformed_uses_defaults() {
        let (db, repo) = setup_test().await;

        db.put_value(SETTINGS_KEY, "null").await.unwrap();
        assert_eq!(repo.load_settings().await, Settings::default());

        db.put_value(SETTINGS_KEY, r#"{"donationIntervalDays": "soon"}"#).await.unwrap();
        assert_eq!(repo.load_settings().await, Settings::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (_db, repo) = setup_test().await;

        let settings = Settings {
            donation_interval_days: 56,
            theme: Theme::Dark,
            locale: "en".to_string(),
        };
        repo.save_settings(&settings).await.unwrap();

        assert_eq!(repo.load_settings().await, settings);
    }
}
