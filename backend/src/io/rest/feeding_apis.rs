//! # REST API for Feeding Sessions
//!
//! `/api/feedings`: list, log, edit and delete feedings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{CreateFeedingRequest, DeleteResponse, UpdateFeedingRequest};
use tracing::info;

use super::error::error_response;
use super::mappers::{parse_instant, FeedingMapper};
use super::session::CurrentSession;
use super::{parse_since_instant, SinceQuery};
use crate::AppState;

pub async fn list_feedings(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<SinceQuery>,
) -> impl IntoResponse {
    info!("GET /api/feedings - since: {:?}", query.since);

    let since = match parse_since_instant(&query) {
        Ok(since) => since,
        Err(e) => return error_response(e),
    };
    let feedings = state.feedings.list(&session.baby_id, since).await;
    let dtos: Vec<_> = feedings.into_iter().map(FeedingMapper::to_dto).collect();
    (StatusCode::OK, Json(dtos)).into_response()
}

pub async fn create_feeding(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<CreateFeedingRequest>,
) -> impl IntoResponse {
    info!("POST /api/feedings - request: {:?}", request);

    let feeding = match FeedingMapper::to_domain(&session.baby_id, request, Utc::now()) {
        Ok(feeding) => feeding,
        Err(e) => return error_response(e),
    };
    match state.feedings.create(feeding).await {
        Ok(feeding) => (StatusCode::OK, Json(FeedingMapper::to_dto(feeding))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_feeding(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(request): Json<UpdateFeedingRequest>,
) -> impl IntoResponse {
    info!("PUT /api/feedings/{} - request: {:?}", id, request);

    let parsed = parse_instant("timestamp", &request.timestamp)
        .and_then(|taken_at| Ok((taken_at, FeedingMapper::clean_note(request.note)?)));
    let (taken_at, note) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return error_response(e),
    };
    let side = request.side;
    match state
        .feedings
        .update(&session.baby_id, &id, |feeding| {
            feeding.taken_at = taken_at;
            feeding.side = side;
            feeding.note = note;
        })
        .await
    {
        Ok(feeding) => (StatusCode::OK, Json(FeedingMapper::to_dto(feeding))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_feeding(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/feedings/{}", id);

    match state.feedings.delete(&session.baby_id, &id).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { success: true, deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
