//! Domain model for application settings.

use shared::Theme;

pub const DEFAULT_DONATION_INTERVAL_DAYS: u32 = 90;
pub const DEFAULT_LOCALE: &str = "bn";

/// Settings that drive eligibility and presentation.
///
/// Only `donation_interval_days` influences the domain; theme and locale are
/// carried for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub donation_interval_days: u32,
    pub theme: Theme,
    pub locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            donation_interval_days: DEFAULT_DONATION_INTERVAL_DAYS,
            theme: Theme::default(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsValidationError {
    #[error("Donation interval must be a positive number of days")]
    NonPositiveInterval,
    #[error("Locale cannot be empty")]
    EmptyLocale,
}

pub fn validate_interval(days: u32) -> Result<u32, SettingsValidationError> {
    if days == 0 {
        return Err(SettingsValidationError::NonPositiveInterval);
    }
    Ok(days)
}
