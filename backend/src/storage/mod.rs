//! # Storage Module
//!
//! Persistence for the donor tracker. Everything is stored as JSON blobs in a
//! key-value store; the repositories own the keys and the JSON layout, the
//! store only moves strings.
//!
//! - **traits**: `KeyValueStorage`, the seam the repositories depend on
//! - **sqlite**: `DbConnection`, a SQLite `key_values` table via sqlx
//! - **repositories**: typed access to the donor list and the settings

pub mod traits;
pub mod sqlite;
pub mod repositories;

pub use traits::KeyValueStorage;
pub use sqlite::DbConnection;
pub use repositories::{DonorRepository, SettingsRepository};
