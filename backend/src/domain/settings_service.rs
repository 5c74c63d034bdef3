//! Settings domain logic.
//!
//! Settings are loaded once at startup and only change through an explicit
//! save. The donation interval is read fresh by every eligibility
//! computation, so a change reclassifies every donor on the next read.
//!
//! Writers are serialized: the write lock is held from reading the current
//! settings until the saved copy is published.

use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};
use shared::Theme;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::commands::settings::UpdateSettingsCommand;
use super::errors::RegistryResult;
use super::models::settings::{validate_interval, Settings, SettingsValidationError};
use crate::storage::SettingsRepository;

#[derive(Clone)]
pub struct SettingsService {
    settings: Arc<RwLock<Settings>>,
    write_lock: Arc<Mutex<()>>,
    repository: SettingsRepository,
}

impl SettingsService {
    /// Load the stored settings (defaults when absent or unreadable)
    pub async fn load(repository: SettingsRepository) -> Self {
        let settings = repository.load_settings().await;
        info!(
            "Settings loaded: interval={} days, theme={:?}, locale={}",
            settings.donation_interval_days, settings.theme, settings.locale
        );

        Self {
            settings: Arc::new(RwLock::new(settings)),
            write_lock: Arc::new(Mutex::new(())),
            repository,
        }
    }

    /// Snapshot of the current settings
    pub fn current(&self) -> Settings {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Current cooldown interval in days
    pub fn donation_interval_days(&self) -> u32 {
        self.current().donation_interval_days
    }

    /// Validate, persist and apply a settings change
    pub async fn update_settings(&self, command: UpdateSettingsCommand) -> RegistryResult<Settings> {
        info!("Updating settings: {:?}", command);

        let (settings, _) = self
            .mutate(|next| {
                if let Some(days) = command.donation_interval_days {
                    next.donation_interval_days = validate_interval(days)?;
                }
                if let Some(theme) = command.theme {
                    next.theme = theme;
                }
                if let Some(locale) = command.locale {
                    let locale = locale.trim();
                    if locale.is_empty() {
                        return Err(SettingsValidationError::EmptyLocale.into());
                    }
                    next.locale = locale.to_string();
                }
                Ok(())
            })
            .await?;

        Ok(settings)
    }

    /// Shallow-merge a `settings` object from an import document.
    ///
    /// Unknown keys and values of the wrong type are ignored. Returns whether
    /// anything changed.
    pub async fn merge_imported(&self, incoming: &Map<String, Value>) -> RegistryResult<bool> {
        let (_, changed) = self
            .mutate(|next| {
                merge_fields(next, incoming);
                Ok(())
            })
            .await?;

        Ok(changed)
    }

    /// Apply `change` to a copy of the settings, persist it if it differs,
    /// then publish it. Returns the resulting settings and whether they changed.
    async fn mutate<F>(&self, change: F) -> RegistryResult<(Settings, bool)>
    where
        F: FnOnce(&mut Settings) -> RegistryResult<()>,
    {
        let _guard = self.write_lock.lock().await;

        let current = self.current();
        let mut next = current.clone();
        change(&mut next)?;

        if next == current {
            return Ok((next, false));
        }

        self.repository.save_settings(&next).await?;

        match self.settings.write() {
            Ok(mut guard) => *guard = next.clone(),
            Err(poisoned) => *poisoned.into_inner() = next.clone(),
        }

        info!("Settings saved: interval={} days", next.donation_interval_days);
        Ok((next, true))
    }
}

/// Copy the recognised, well-typed fields of `incoming` into `settings`
fn merge_fields(settings: &mut Settings, incoming: &Map<String, Value>) {
    if let Some(value) = incoming.get("donationIntervalDays") {
        match value.as_u64().and_then(|days| u32::try_from(days).ok()).filter(|days| *days > 0) {
            Some(days) => settings.donation_interval_days = days,
            None => warn!("Ignoring imported donation interval {}", value),
        }
    }
    if let Some(value) = incoming.get("theme") {
        match serde_json::from_value::<Theme>(value.clone()) {
            Ok(theme) => settings.theme = theme,
            Err(_) => warn!("Ignoring imported theme {}", value),
        }
    }
    if let Some(value) = incoming.get("locale") {
        match value.as_str().map(str::trim).filter(|s| !s.is_empty()) {
            Some(locale) => settings.locale = locale.to_string(),
            None => warn!("Ignoring imported locale {}", value),
        }
    }
}
