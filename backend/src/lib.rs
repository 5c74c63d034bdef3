//! # Blood Donor Tracker Backend
//!
//! Contains all non-UI logic for the blood donor tracker.
//!
//! - **Domain**: donor registry, eligibility rules, settings, backups
//! - **Storage**: JSON blobs in a SQLite key-value table
//! - **IO**: JSON REST API the UI talks to
//!
//! ## Architecture
//!
//! ```text
//! UI
//!     ↓
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (registry, services)
//!     ↓
//! Storage Layer (repositories, SQLite)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::config::{AppConfig, DatabaseLocation};
use crate::domain::{DonorService, ExportService, ImportService, SettingsService};
use crate::storage::{DbConnection, DonorRepository, KeyValueStorage, SettingsRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub donor_service: DonorService,
    pub settings_service: SettingsService,
    pub export_service: ExportService,
    pub import_service: ImportService,
}

/// Open the configured database and initialize every service
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = match &config.database {
        DatabaseLocation::File(path) => DbConnection::open(path).await?,
        DatabaseLocation::Url(url) => DbConnection::connect(url).await?,
    };

    Ok(initialize_with_storage(Arc::new(db_conn)).await)
}

/// Initialize every service on top of an existing store
pub async fn initialize_with_storage(storage: Arc<dyn KeyValueStorage>) -> AppState {
    info!("Setting up domain model");
    let settings_service = SettingsService::load(SettingsRepository::new(storage.clone())).await;
    let donor_service = DonorService::load(DonorRepository::new(storage), settings_service.clone()).await;

    info!("Setting up application state");
    AppState {
        donor_service,
        settings_service,
        export_service: ExportService::new(),
        import_service: ImportService::new(),
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow a locally served frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
        ]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(io::rest::donor_apis::router())
        .merge(io::rest::settings_apis::router())
        .merge(io::rest::export_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
