//! # REST API Interface Layer
//!
//! JSON endpoints the UI drives the donor tracker through. This layer only
//! translates: DTOs from the `shared` crate are mapped to domain commands,
//! domain results back to DTOs, and [`RegistryError`] to HTTP status codes.
//!
//! Every error body has the shape `{ "error": "<message>" }`.

pub mod donor_apis;
pub mod export_apis;
pub mod mappers;
pub mod settings_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::RegistryError;

/// HTTP status for a domain error
pub fn status_for(error: &RegistryError) -> StatusCode {
    match error {
        RegistryError::InvalidDonor(_)
        | RegistryError::InvalidSettings(_)
        | RegistryError::InvalidDate(_)
        | RegistryError::InvalidImport(_)
        | RegistryError::EmptySearch => StatusCode::BAD_REQUEST,
        RegistryError::NotFound(_) | RegistryError::NoMatch(_) => StatusCode::NOT_FOUND,
        RegistryError::AmbiguousMatch { .. } => StatusCode::CONFLICT,
        RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed request and turn the error into a JSON response
pub fn error_response(context: &str, error: RegistryError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("{}: {}", context, error);
    } else {
        warn!("{}: {}", context, error);
    }

    (status, Json(ErrorResponse { error: error.to_string() })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::donor::DonorValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&RegistryError::InvalidDonor(DonorValidationError::EmptyName)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&RegistryError::InvalidDate("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&RegistryError::NotFound("d".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&RegistryError::AmbiguousMatch { search: "a".into(), count: 2 }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&RegistryError::Storage(anyhow::anyhow!("disk full"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
