//! # REST API for Medication Doses
//!
//! `/api/medications`: list, record, re-time and delete doses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{CreateMedicationRequest, DeleteResponse, UpdateMedicationRequest};
use tracing::info;

use super::error::error_response;
use super::mappers::{parse_instant, MedicationMapper};
use super::session::CurrentSession;
use super::{parse_since_instant, SinceQuery};
use crate::AppState;

pub async fn list_medications(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<SinceQuery>,
) -> impl IntoResponse {
    info!("GET /api/medications - since: {:?}", query.since);

    let since = match parse_since_instant(&query) {
        Ok(since) => since,
        Err(e) => return error_response(e),
    };
    let doses = state.medications.list(&session.baby_id, since).await;
    let dtos: Vec<_> = doses.into_iter().map(MedicationMapper::to_dto).collect();
    (StatusCode::OK, Json(dtos)).into_response()
}

pub async fn create_medication(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<CreateMedicationRequest>,
) -> impl IntoResponse {
    info!("POST /api/medications - request: {:?}", request);

    let dose = match MedicationMapper::to_domain(&session.baby_id, request, Utc::now()) {
        Ok(dose) => dose,
        Err(e) => return error_response(e),
    };
    match state.medications.create(dose).await {
        Ok(dose) => (StatusCode::OK, Json(MedicationMapper::to_dto(dose))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_medication(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(request): Json<UpdateMedicationRequest>,
) -> impl IntoResponse {
    info!("PUT /api/medications/{} - request: {:?}", id, request);

    let taken_at = match parse_instant("timestamp", &request.timestamp) {
        Ok(taken_at) => taken_at,
        Err(e) => return error_response(e),
    };
    match state
        .medications
        .update(&session.baby_id, &id, |dose| dose.taken_at = taken_at)
        .await
    {
        Ok(dose) => (StatusCode::OK, Json(MedicationMapper::to_dto(dose))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_medication(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/medications/{}", id);

    match state.medications.delete(&session.baby_id, &id).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { success: true, deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
