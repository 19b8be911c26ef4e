//! # REST API for Baths

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{CreateBathRequest, DeleteResponse, UpdateBathRequest};
use tracing::info;

use super::error::error_response;
use super::mappers::{parse_instant, BathMapper};
use super::session::CurrentSession;
use super::{parse_since_instant, SinceQuery};
use crate::AppState;

pub async fn list_baths(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<SinceQuery>,
) -> impl IntoResponse {
    info!("GET /api/baths - since: {:?}", query.since);

    let since = match parse_since_instant(&query) {
        Ok(since) => since,
        Err(e) => return error_response(e),
    };
    let baths = state.baths.list(&session.baby_id, since).await;
    let dtos: Vec<_> = baths.into_iter().map(BathMapper::to_dto).collect();
    (StatusCode::OK, Json(dtos)).into_response()
}

pub async fn create_bath(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<CreateBathRequest>,
) -> impl IntoResponse {
    info!("POST /api/baths - request: {:?}", request);

    let bath = match BathMapper::to_domain(&session.baby_id, request, Utc::now()) {
        Ok(bath) => bath,
        Err(e) => return error_response(e),
    };
    match state.baths.create(bath).await {
        Ok(bath) => (StatusCode::OK, Json(BathMapper::to_dto(bath))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_bath(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(request): Json<UpdateBathRequest>,
) -> impl IntoResponse {
    info!("PUT /api/baths/{} - request: {:?}", id, request);

    let taken_at = match parse_instant("timestamp", &request.timestamp) {
        Ok(taken_at) => taken_at,
        Err(e) => return error_response(e),
    };
    match state
        .baths
        .update(&session.baby_id, &id, |bath| bath.taken_at = taken_at)
        .await
    {
        Ok(bath) => (StatusCode::OK, Json(BathMapper::to_dto(bath))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_bath(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/baths/{}", id);

    match state.baths.delete(&session.baby_id, &id).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { success: true, deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
