//! Runtime configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DATA_DIR_VAR: &str = "DONOR_TRACKER_DATA_DIR";
pub const DATABASE_URL_VAR: &str = "DONOR_TRACKER_DATABASE_URL";
pub const ADDR_VAR: &str = "DONOR_TRACKER_ADDR";

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const APP_DIR_NAME: &str = "Blood Donor Tracker";
const DATABASE_FILE_NAME: &str = "donors.db";

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// SQLite file, created on first start
    File(PathBuf),
    /// Explicit sqlx connection URL
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database: DatabaseLocation,
    pub addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = match var(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().context("Could not determine a data directory; set DONOR_TRACKER_DATA_DIR")?,
        };

        let database = match var(DATABASE_URL_VAR) {
            Some(url) => DatabaseLocation::Url(url),
            None => DatabaseLocation::File(data_dir.join(DATABASE_FILE_NAME)),
        };

        let raw_addr = var(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid {} value {:?}", ADDR_VAR, raw_addr))?;

        Ok(Self { data_dir, database, addr })
    }
}

/// `<documents>/Blood Donor Tracker`, else the same under the home directory
fn default_data_dir() -> Option<PathBuf> {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join(APP_DIR_NAME))
}
