//! backend/src/io/rest/mappers/settings_mapper.rs

use shared::{Settings as SharedSettings, UpdateSettingsRequest};
use tracing::warn;

use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::models::settings::{Settings, DEFAULT_DONATION_INTERVAL_DAYS, DEFAULT_LOCALE};

/// Mapper to convert between shared settings DTOs and domain settings.
pub struct SettingsMapper;

impl SettingsMapper {
    /// Converts stored settings, replacing values the domain cannot use.
    pub fn to_domain(dto: SharedSettings) -> Settings {
        let donation_interval_days = if dto.donation_interval_days == 0 {
            warn!("Stored donation interval is 0, using {}", DEFAULT_DONATION_INTERVAL_DAYS);
            DEFAULT_DONATION_INTERVAL_DAYS
        } else {
            dto.donation_interval_days
        };

        let locale = if dto.locale.trim().is_empty() {
            DEFAULT_LOCALE.to_string()
        } else {
            dto.locale
        };

        Settings {
            donation_interval_days,
            theme: dto.theme,
            locale,
        }
    }

    pub fn to_update_command(request: UpdateSettingsRequest) -> UpdateSettingsCommand {
        UpdateSettingsCommand {
            donation_interval_days: request.donation_interval_days,
            theme: request.theme,
            locale: request.locale,
        }
    }

    pub fn to_dto(domain: Settings) -> SharedSettings {
        SharedSettings {
            donation_interval_days: domain.donation_interval_days,
            theme: domain.theme,
            locale: domain.locale,
        }
    }
}
