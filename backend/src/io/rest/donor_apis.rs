//! # REST API for Donor Management
//!
//! Endpoints for the donor list, donor profiles, donation history, quick
//! donate and the dashboard counters.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use shared::{
    CreateDonorRequest, DashboardResponse, DeleteDonationResponse, DeleteDonorResponse, DonorListRequest,
    DonorListResponse, DonorResponse, QuickDonateRequest, RecordDonationRequest, UpdateDonorRequest,
};
use tracing::info;

use super::error_response;
use super::mappers::donor_mapper::DonorMapper;
use crate::domain::date_utils;
use crate::AppState;

/// Router for the `/donors` and `/dashboard` endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/donors", get(list_donors).post(create_donor))
        .route("/donors/quick-donate", post(quick_donate))
        .route("/donors/:id", get(get_donor).put(update_donor).delete(delete_donor))
        .route("/donors/:id/donations", post(record_donation))
        .route("/donors/:id/donations/:date", delete(delete_donation))
        .route("/dashboard", get(get_dashboard))
}

/// List donors, filtered and sorted by name
pub async fn list_donors(
    State(state): State<AppState>,
    Query(request): Query<DonorListRequest>,
) -> impl IntoResponse {
    info!("GET /api/donors - query: {:?}", request);

    let donors = state
        .donor_service
        .list_donors(DonorMapper::to_query(request), date_utils::today())
        .await;

    let response = DonorListResponse {
        donors: donors.into_iter().map(DonorMapper::to_summary_dto).collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Create a new donor
pub async fn create_donor(
    State(state): State<AppState>,
    Json(request): Json<CreateDonorRequest>,
) -> impl IntoResponse {
    info!("POST /api/donors - request: {:?}", request);

    match state
        .donor_service
        .create_donor(DonorMapper::to_create_command(request), date_utils::today())
        .await
    {
        Ok(view) => {
            let response = DonorResponse {
                success_message: format!("Saved {}", view.donor.name),
                donor: DonorMapper::to_summary_dto(view),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to create donor", e),
    }
}

/// Get a donor by ID
pub async fn get_donor(State(state): State<AppState>, Path(donor_id): Path<String>) -> impl IntoResponse {
    info!("GET /api/donors/{}", donor_id);

    match state.donor_service.get_donor(&donor_id, date_utils::today()).await {
        Ok(view) => (StatusCode::OK, Json(DonorMapper::to_summary_dto(view))).into_response(),
        Err(e) => error_response("Failed to get donor", e),
    }
}

/// Update a donor; a recent donation is added to the history
pub async fn update_donor(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
    Json(request): Json<UpdateDonorRequest>,
) -> impl IntoResponse {
    info!("PUT /api/donors/{} - request: {:?}", donor_id, request);

    match state
        .donor_service
        .update_donor(&donor_id, DonorMapper::to_update_command(request), date_utils::today())
        .await
    {
        Ok(view) => {
            let response = DonorResponse {
                success_message: format!("Updated {}", view.donor.name),
                donor: DonorMapper::to_summary_dto(view),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to update donor", e),
    }
}

/// Delete a donor
pub async fn delete_donor(State(state): State<AppState>, Path(donor_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/donors/{}", donor_id);

    match state.donor_service.delete_donor(&donor_id).await {
        Ok(donor) => {
            let response = DeleteDonorResponse {
                success_message: format!("Deleted {}", donor.name),
                deleted_id: donor.id,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to delete donor", e),
    }
}

/// Record a donation (today unless a date is given)
pub async fn record_donation(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
    Json(request): Json<RecordDonationRequest>,
) -> impl IntoResponse {
    info!("POST /api/donors/{}/donations - request: {:?}", donor_id, request);

    match state
        .donor_service
        .record_donation(&donor_id, request.date.as_deref(), date_utils::today())
        .await
    {
        Ok(view) => {
            let response = DonorResponse {
                success_message: format!("Donation recorded for {}", view.donor.name),
                donor: DonorMapper::to_summary_dto(view),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to record donation", e),
    }
}

/// Remove every donation recorded on a date
pub async fn delete_donation(
    State(state): State<AppState>,
    Path((donor_id, date)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/donors/{}/donations/{}", donor_id, date);

    match state
        .donor_service
        .delete_donation(&donor_id, &date, date_utils::today())
        .await
    {
        Ok(result) => {
            let success_message = if result.removed_count == 0 {
                format!("No donation on {} to remove", date)
            } else {
                format!("Removed donation on {}", date)
            };
            let response = DeleteDonationResponse {
                donor: DonorMapper::to_summary_dto(result.donor),
                removed_count: result.removed_count,
                success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Failed to delete donation", e),
    }
}

/// Record today's donation for the one donor matching a name search
pub async fn quick_donate(
    State(state): State<AppState>,
    Json(request): Json<QuickDonateRequest>,
) -> impl IntoResponse {
    info!("POST /api/donors/quick-donate - search: {:?}", request.search);

    match state.donor_service.quick_donate(&request.search, date_utils::today()).await {
        Ok(view) => {
            let response = DonorResponse {
                success_message: format!("Donation recorded for {}", view.donor.name),
                donor: DonorMapper::to_summary_dto(view),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Quick donate failed", e),
    }
}

/// Dashboard counters for today
pub async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    let stats = state.donor_service.dashboard(date_utils::today()).await;
    let response = DashboardResponse {
        total_profiles: stats.total_profiles,
        eligible_today: stats.eligible_today,
        upcoming_7_days: stats.upcoming_7_days,
    };
    (StatusCode::OK, Json(response)).into_response()
}
