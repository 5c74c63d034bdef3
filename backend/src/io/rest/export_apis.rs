//! # REST API for Backup and Restore
//!
//! Endpoints for exporting the registry as JSON or CSV, writing exports to a
//! directory on disk, and importing a JSON backup.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use shared::{
    ExportDataRequest, ExportDataResponse, ExportToPathRequest, ExportToPathResponse, ImportDataRequest,
    ImportDataResponse,
};
use tracing::info;

use super::error_response;
use crate::domain::date_utils;
use crate::AppState;

/// Router for the `/export` and `/import` endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export", post(export_data))
        .route("/export/to-path", post(export_to_path))
        .route("/import", post(import_data))
}

/// Render the registry for download
pub async fn export_data(
    State(state): State<AppState>,
    Json(request): Json<ExportDataRequest>,
) -> impl IntoResponse {
    info!("POST /api/export - format: {:?}", request.format);

    match state
        .export_service
        .export_data(
            request.format,
            &state.donor_service,
            &state.settings_service,
            date_utils::today(),
        )
        .await
    {
        Ok(artifact) => {
            let response = ExportDataResponse {
                content: artifact.content,
                filename: artifact.filename,
                profile_count: artifact.profile_count,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to export donors", e),
    }
}

/// Write the export into a directory (documents directory by default)
pub async fn export_to_path(
    State(state): State<AppState>,
    Json(request): Json<ExportToPathRequest>,
) -> impl IntoResponse {
    info!("POST /api/export/to-path - request: {:?}", request);

    match state
        .export_service
        .export_to_path(
            request.custom_path.as_deref(),
            request.format,
            &state.donor_service,
            &state.settings_service,
            date_utils::today(),
        )
        .await
    {
        Ok((paths, profile_count)) => {
            let file_paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            let response = ExportToPathResponse {
                success: true,
                message: format!("Exported {} donors to {}", profile_count, file_paths.join(", ")),
                file_paths,
                profile_count,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to export donors to path", e),
    }
}

/// Append the donors of a JSON backup and merge its settings
pub async fn import_data(
    State(state): State<AppState>,
    Json(request): Json<ImportDataRequest>,
) -> impl IntoResponse {
    info!("POST /api/import - {} bytes", request.content.len());

    match state
        .import_service
        .import_document(&request.content, &state.donor_service, &state.settings_service)
        .await
    {
        Ok(result) => {
            let success_message = match &result.settings_error {
                Some(e) => format!(
                    "Imported {} donors, but the settings could not be saved: {}",
                    result.imported_count, e
                ),
                None => format!("Imported {} donors", result.imported_count),
            };
            let response = ImportDataResponse {
                imported_count: result.imported_count,
                reassigned_ids: result.reassigned_ids,
                settings_updated: result.settings_updated,
                settings_error: result.settings_error,
                success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to import backup", e),
    }
}
