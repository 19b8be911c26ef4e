//! # REST API for Sleep
//!
//! `/api/sleep`: one night per record, keyed by the date the night started.
//! Bed and wake time are set independently; a write replaces both endpoints
//! and the comment with the values sent.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{DeleteResponse, UpdateSleepRequest, UpsertSleepRequest};
use tracing::info;

use super::error::error_response;
use super::mappers::{parse_date, SleepMapper};
use super::session::CurrentSession;
use super::{parse_since_date, SinceQuery};
use crate::AppState;

pub async fn list_sleep(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<SinceQuery>,
) -> impl IntoResponse {
    info!("GET /api/sleep - since: {:?}", query.since);

    let since = match parse_since_date(&query) {
        Ok(since) => since,
        Err(e) => return error_response(e),
    };
    let nights = state.sleep.list(&session.baby_id, since).await;
    let dtos: Vec<_> = nights.into_iter().map(SleepMapper::to_dto).collect();
    (StatusCode::OK, Json(dtos)).into_response()
}

pub async fn upsert_sleep(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<UpsertSleepRequest>,
) -> impl IntoResponse {
    info!("POST /api/sleep - request: {:?}", request);

    let night = match SleepMapper::to_domain(&session.baby_id, request, Utc::now()) {
        Ok(night) => night,
        Err(e) => return error_response(e),
    };
    match state.sleep.upsert(night).await {
        Ok(night) => (StatusCode::OK, Json(SleepMapper::to_dto(night))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_sleep(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(date): Path<String>,
    Json(request): Json<UpdateSleepRequest>,
) -> impl IntoResponse {
    info!("PUT /api/sleep/{} - request: {:?}", date, request);

    let parsed = parse_date(&date).and_then(|date| {
        let fields = SleepMapper::parse_fields(
            request.bed_time.as_deref(),
            request.wake_time.as_deref(),
            request.comment,
        )?;
        Ok((date, fields))
    });
    let (date, fields) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return error_response(e),
    };
    match state
        .sleep
        .update(&session.baby_id, date, |night| {
            night.bed_time = fields.bed_time;
            night.wake_time = fields.wake_time;
            night.comment = fields.comment;
        })
        .await
    {
        Ok(night) => (StatusCode::OK, Json(SleepMapper::to_dto(night))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_sleep(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/sleep/{}", date);

    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(e) => return error_response(e),
    };
    match state.sleep.delete(&session.baby_id, date).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { success: true, deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
