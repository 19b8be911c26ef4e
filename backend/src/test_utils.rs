//! In-process harness for driving the router in tests.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::Settings;
use crate::io::rest::session::SESSION_COOKIE;
use crate::storage::JsonConnection;
use crate::{create_router, AppState};

pub const INVITATION_CODE: &str = "family-only";

pub struct TestApp {
    pub router: Router,
    pub connection: JsonConnection,
    _data_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        let (connection, data_dir) = JsonConnection::open_temp().await.unwrap();
        let state = AppState::new(connection.clone(), INVITATION_CODE, Duration::days(30));
        let settings = Settings::from_toml_str("").unwrap();
        let router = create_router(state, &settings.server).unwrap();
        Self {
            router,
            connection,
            _data_dir: data_dir,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, session: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(session), None).await
    }

    pub async fn post(&self, uri: &str, session: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(session), Some(body)).await
    }

    pub async fn put(&self, uri: &str, session: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(session), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, session: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(session), None).await
    }

    /// Register a caregiver and return their session token
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/register",
                None,
                Some(json!({
                    "username": username,
                    "password": "correct horse",
                    "babyName": format!("{username}'s baby"),
                    "dateOfBirth": "2024-01-02",
                    "invitationCode": INVITATION_CODE,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "register failed: {:?}", response.body);
        session_from(&response.headers).unwrap()
    }
}

/// The session token from a `Set-Cookie` header
pub fn session_from(headers: &HeaderMap) -> Option<String> {
    let cookie = headers.get(header::SET_COOKIE)?.to_str().ok()?;
    let (pair, _) = cookie.split_once(';')?;
    let (name, token) = pair.split_once('=')?;
    (name == SESSION_COOKIE && !token.is_empty()).then(|| token.to_string())
}
