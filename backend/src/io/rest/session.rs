//! Session cookie handling and the `CurrentSession` extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::Response,
};
use tracing::debug;

use super::error::unauthorized;
use crate::domain::Session;
use crate::AppState;

pub const SESSION_COOKIE: &str = "baby-tracker-session";

/// The caller's live session. Rejects with 401 when the cookie is missing,
/// unknown or expired.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            debug!("{} {} without session cookie", parts.method, parts.uri.path());
            return Err(unauthorized());
        };
        match state.session_service.resolve(&token).await {
            Some(session) => Ok(CurrentSession(session)),
            None => {
                debug!("{} {} with unknown session", parts.method, parts.uri.path());
                Err(unauthorized())
            }
        }
    }
}

/// The session token from the `Cookie` header, if any
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, max_age_seconds: i64) -> HeaderValue {
    cookie_header(&format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    ))
}

pub fn clear_session_cookie() -> HeaderValue {
    cookie_header(&format!(
        "{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
    ))
}

fn cookie_header(value: &str) -> HeaderValue {
    // Tokens are hex and the attributes are fixed ASCII
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}
