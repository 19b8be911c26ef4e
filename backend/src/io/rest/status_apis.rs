use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use tracing::info;

use super::mappers::StatusMapper;
use super::session::CurrentSession;
use crate::AppState;

/// Full snapshot for the caller's baby, diapers and sleep windowed
pub async fn get_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    info!("GET /api/status - baby: {}", session.baby_id);

    let status = state.status_service.snapshot(&session.baby_id, Utc::now()).await;
    (StatusCode::OK, Json(StatusMapper::to_dto(status)))
}
