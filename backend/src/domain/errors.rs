//! Error type shared by the registry, settings and transfer services.

use super::models::donor::DonorValidationError;
use super::models::settings::SettingsValidationError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidDonor(#[from] DonorValidationError),
    #[error(transparent)]
    InvalidSettings(#[from] SettingsValidationError),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Donor not found: {0}")]
    NotFound(String),
    #[error("Invalid import document: {0}")]
    InvalidImport(String),
    #[error("Enter a name to search for first")]
    EmptySearch,
    #[error("No donor matches \"{0}\"")]
    NoMatch(String),
    #[error("{count} donors match \"{search}\"; pick one from the list")]
    AmbiguousMatch { search: String, count: usize },
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
