//! # Domain Module
//!
//! Business logic for the blood donor tracker, independent of the UI and of
//! the storage backend.
//!
//! ## Module Organization
//!
//! - **date_utils**: calendar-day parsing and arithmetic
//! - **eligibility**: next eligible date, status classification, list filters
//! - **registry**: the in-memory donor collection and its queries
//! - **donor_service**: registry + persistence, one method per UI operation
//! - **settings_service**: cooldown interval and presentation preferences
//! - **export_service** / **import_service**: backups in and out
//!
//! ## Business Rules
//!
//! - A donor becomes eligible `donation_interval_days` after their latest donation
//! - Eligibility is derived on every read and never stored
//! - Editing a donor adds to the donation history, it never replaces it
//! - Import only appends; existing donors are never overwritten

pub mod commands;
pub mod date_utils;
pub mod donor_service;
pub mod eligibility;
pub mod errors;
pub mod export_service;
pub mod import_service;
pub mod models;
pub mod registry;
pub mod settings_service;

pub use donor_service::DonorService;
pub use errors::{RegistryError, RegistryResult};
pub use export_service::ExportService;
pub use import_service::ImportService;
pub use settings_service::SettingsService;
