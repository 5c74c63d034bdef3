pub mod donor_repository;
pub mod settings_repository;

pub use donor_repository::{DonorRepository, DONORS_KEY};
pub use settings_repository::{SettingsRepository, SETTINGS_KEY};
