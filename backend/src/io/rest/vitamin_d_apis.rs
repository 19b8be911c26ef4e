//! # REST API for Vitamin D
//!
//! `/api/vitamin-d`: one record per calendar day, addressed by `YYYY-MM-DD`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{DeleteResponse, UpdateVitaminDRequest, UpsertVitaminDRequest};
use tracing::info;

use super::error::error_response;
use super::mappers::{parse_date, VitaminDMapper};
use super::session::CurrentSession;
use super::{parse_since_date, SinceQuery};
use crate::AppState;

pub async fn list_vitamin_d(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<SinceQuery>,
) -> impl IntoResponse {
    info!("GET /api/vitamin-d - since: {:?}", query.since);

    let since = match parse_since_date(&query) {
        Ok(since) => since,
        Err(e) => return error_response(e),
    };
    let records = state.vitamin_d.list(&session.baby_id, since).await;
    let dtos: Vec<_> = records.into_iter().map(VitaminDMapper::to_dto).collect();
    (StatusCode::OK, Json(dtos)).into_response()
}

pub async fn upsert_vitamin_d(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<UpsertVitaminDRequest>,
) -> impl IntoResponse {
    info!("POST /api/vitamin-d - request: {:?}", request);

    let record = match VitaminDMapper::to_domain(&session.baby_id, request, Utc::now()) {
        Ok(record) => record,
        Err(e) => return error_response(e),
    };
    match state.vitamin_d.upsert(record).await {
        Ok(record) => (StatusCode::OK, Json(VitaminDMapper::to_dto(record))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_vitamin_d(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(date): Path<String>,
    Json(request): Json<UpdateVitaminDRequest>,
) -> impl IntoResponse {
    info!("PUT /api/vitamin-d/{} - request: {:?}", date, request);

    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(e) => return error_response(e),
    };
    match state
        .vitamin_d
        .update(&session.baby_id, date, |record| record.taken = request.taken)
        .await
    {
        Ok(record) => (StatusCode::OK, Json(VitaminDMapper::to_dto(record))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_vitamin_d(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(date): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/vitamin-d/{}", date);

    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(e) => return error_response(e),
    };
    match state.vitamin_d.delete(&session.baby_id, date).await {
        Ok(deleted) => (StatusCode::OK, Json(DeleteResponse { success: true, deleted })).into_response(),
        Err(e) => error_response(e),
    }
}
