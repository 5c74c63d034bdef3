//! # REST API for Settings
//!
//! Endpoints for reading and saving the donation interval and the
//! presentation preferences.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{SettingsResponse, UpdateSettingsRequest};
use tracing::info;

use super::error_response;
use super::mappers::settings_mapper::SettingsMapper;
use crate::AppState;

/// Router for the `/settings` endpoints
pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}

/// Get the current settings
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");

    let response = SettingsResponse {
        settings: SettingsMapper::to_dto(state.settings_service.current()),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Save settings; omitted fields keep their current value
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings - request: {:?}", request);

    match state
        .settings_service
        .update_settings(SettingsMapper::to_update_command(request))
        .await
    {
        Ok(settings) => {
            let response = SettingsResponse {
                settings: SettingsMapper::to_dto(settings),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to save settings", e),
    }
}
