use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::DomainError;

/// Translate a domain error into its HTTP status and `{ "error": ... }` body
pub fn error_response(e: DomainError) -> Response {
    let status = match &e {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {}", e);
        "Internal server error".to_string()
    } else {
        warn!("Request rejected ({}): {}", status.as_u16(), e);
        e.to_string()
    };

    (status, Json(ErrorResponse::new(message))).into_response()
}

pub fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("Unauthorized"))).into_response()
}
