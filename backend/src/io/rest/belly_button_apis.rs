//! # REST API for Belly-Button Care
//!
//! `/api/belly-button`: morning and evening cleaning flags per calendar day.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{DeleteResponse, UpdateBellyButtonRequest, UpsertBellyButtonRequest};
use tracing::info;

use super::error::error_response;
use super::mappers::{parse_date, BellyButtonMapper};
use super::session::CurrentSession;
use super::{parse_since_date, SinceQuery};
use crate::AppState;

pub async fn list_belly_button(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<SinceQuery>,
) -> impl IntoResponse {
    info!("GET /api/belly-button - since: {:?}", query.since);

    let since = match parse_since_date(&query) {
        Ok(since) => since,
        Err(e) => return error_response(e),
    };
    let records = state.belly_button.list(&session.baby_id, since).await;
    let dtos: Vec<_> = records.into_iter().map(BellyButtonMapper::to_dto).collect();
    (StatusCode::OK, Json(dtos)).into_response()
}

pub async fn upsert_belly_button(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<UpsertBellyButtonRequest>,
) -> impl IntoResponse {
    info!("POST /api/belly-button - request: {:?}", request);

    let record = match BellyButtonMapper::to_domain(&session.baby_id, request, Utc::now()) {
        Ok(record) => record,
        Err(e) => return error_response(e),
    };
    match state.belly_button.upsert(record).await {
        Ok(record) => (StatusCode::OK, Json(BellyButtonMapper::to_dto(record))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_belly_button(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(date): Path<String>,
    Json(request): Json<UpdateBellyButtonRequest>,
) -> impl IntoResponse {
    info!("PUT /api/belly-button/{} - request: {:?}", date, request);

    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(e) => return error_response(e),
    };
    match state
        .belly_button
        .update(&session.baby_id, date, |record| {
            record.morning = request.morning;
            record.evening = request.evening;
        })
        .await
    {
        Ok(record) => (StatusCode::OK, Json(BellyButtonMapper::to_dto(record))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_belly_button(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/belly-button/{}", date);

    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(e) => return error_response(e),
    };
    match state.belly_button.delete(&session.baby_id, date).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { success: true, deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
