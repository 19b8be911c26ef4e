//! # REST API for Diaper Changes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{CreateDiaperRequest, DeleteResponse, UpdateDiaperRequest};
use tracing::info;

use super::error::error_response;
use super::mappers::{parse_instant, DiaperMapper};
use super::session::CurrentSession;
use super::{parse_since_instant, SinceQuery};
use crate::AppState;

pub async fn list_diapers(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<SinceQuery>,
) -> impl IntoResponse {
    info!("GET /api/diapers - since: {:?}", query.since);

    let since = match parse_since_instant(&query) {
        Ok(since) => since,
        Err(e) => return error_response(e),
    };
    let diapers = state.diapers.list(&session.baby_id, since).await;
    let dtos: Vec<_> = diapers.into_iter().map(DiaperMapper::to_dto).collect();
    (StatusCode::OK, Json(dtos)).into_response()
}

pub async fn create_diaper(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<CreateDiaperRequest>,
) -> impl IntoResponse {
    info!("POST /api/diapers - request: {:?}", request);

    let change = match DiaperMapper::to_domain(&session.baby_id, request, Utc::now()) {
        Ok(change) => change,
        Err(e) => return error_response(e),
    };
    match state.diapers.create(change).await {
        Ok(change) => (StatusCode::OK, Json(DiaperMapper::to_dto(change))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_diaper(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(request): Json<UpdateDiaperRequest>,
) -> impl IntoResponse {
    info!("PUT /api/diapers/{} - request: {:?}", id, request);

    let taken_at = match parse_instant("timestamp", &request.timestamp) {
        Ok(taken_at) => taken_at,
        Err(e) => return error_response(e),
    };
    let diaper_type = request.diaper_type;
    match state
        .diapers
        .update(&session.baby_id, &id, |change| {
            change.taken_at = taken_at;
            change.diaper_type = diaper_type;
        })
        .await
    {
        Ok(change) => (StatusCode::OK, Json(DiaperMapper::to_dto(change))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_diaper(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/diapers/{}", id);

    match state.diapers.delete(&session.baby_id, &id).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { success: true, deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
