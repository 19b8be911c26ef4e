//! # REST API for Caregiver Identity
//!
//! Registration, login, logout and session checks. A successful login or
//! registration sets the `baby-tracker-session` cookie.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use shared::{ErrorResponse, LoginRequest, RegisterRequest, SessionResponse, SuccessResponse};
use tracing::{info, warn};

use super::error::error_response;
use super::mappers::AuthMapper;
use super::session::{clear_session_cookie, session_cookie, session_token};
use crate::domain::commands::AuthenticatedAccount;
use crate::domain::DomainError;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/register - username: {}", request.username);

    let command = match AuthMapper::to_register_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(e),
    };
    match state.account_service.register(command).await {
        Ok(registered) => start_session(&state, registered).await,
        Err(e) => error_response(e),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/login - username: {}", request.username);

    match state
        .account_service
        .login(AuthMapper::to_login_command(request))
        .await
    {
        Ok(account) => start_session(&state, account).await,
        Err(DomainError::Unauthorized) => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid credentials")),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/logout");

    if let Some(token) = session_token(&headers) {
        state.session_service.end(&token).await;
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(SuccessResponse { success: true }),
    )
}

pub async fn check_session(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/check-session");

    let anonymous = || (StatusCode::UNAUTHORIZED, Json(SessionResponse::anonymous())).into_response();

    let Some(token) = session_token(&headers) else {
        return anonymous();
    };
    let Some(session) = state.session_service.resolve(&token).await else {
        return anonymous();
    };
    match state.account_service.get(&session.account_id).await {
        Some(account) => (StatusCode::OK, Json(AuthMapper::to_session_dto(account))).into_response(),
        None => {
            warn!("Session refers to missing account {}", session.account_id);
            state.session_service.end(&token).await;
            anonymous()
        }
    }
}

async fn start_session(state: &AppState, authenticated: AuthenticatedAccount) -> Response {
    let token = state
        .session_service
        .start(
            &authenticated.account.id,
            &authenticated.account.username,
            &authenticated.baby.id,
        )
        .await;
    let max_age = state.session_service.ttl().num_seconds();
    (
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&token, max_age))],
        Json(AuthMapper::to_session_dto(authenticated)),
    )
        .into_response()
}
