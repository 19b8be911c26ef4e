use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    Collection, ErrorResponse, LoginRequest, RegisterRequest, SessionResponse, StatusSnapshot,
};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Failure of one call against the Record Access API
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Unauthorized or forbidden; the caller should be treated as logged out
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized | ApiError::Rejected { status: 403, .. }
        )
    }
}

/// One point write against a collection
#[derive(Debug, Clone, PartialEq)]
pub enum RecordWrite {
    /// `POST /X`: create, or upsert by day for day-keyed collections
    Create { collection: Collection, body: Value },
    /// `PUT /X/{key}`
    Update {
        collection: Collection,
        key: String,
        body: Value,
    },
    /// `DELETE /X/{key}`
    Delete { collection: Collection, key: String },
}

impl RecordWrite {
    pub fn create(collection: Collection, body: &impl Serialize) -> Result<Self, ApiError> {
        Ok(RecordWrite::Create {
            collection,
            body: to_body(body)?,
        })
    }

    pub fn update(
        collection: Collection,
        key: impl Into<String>,
        body: &impl Serialize,
    ) -> Result<Self, ApiError> {
        Ok(RecordWrite::Update {
            collection,
            key: key.into(),
            body: to_body(body)?,
        })
    }

    pub fn delete(collection: Collection, key: impl Into<String>) -> Self {
        RecordWrite::Delete {
            collection,
            key: key.into(),
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            RecordWrite::Create { collection, .. }
            | RecordWrite::Update { collection, .. }
            | RecordWrite::Delete { collection, .. } => *collection,
        }
    }
}

fn to_body(body: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// The record surface the synchronizer and the mutation pipeline consume
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// `GET /status`
    async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError>;

    /// `GET /X`, undecoded
    async fn fetch_collection(&self, collection: Collection) -> Result<Value, ApiError>;

    /// Issue a write and return the response body
    async fn send(&self, write: RecordWrite) -> Result<Value, ApiError>;
}

/// The login/session surface consumed by the auth state
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn check_session(&self) -> Result<SessionResponse, ApiError>;
    async fn login(&self, request: LoginRequest) -> Result<SessionResponse, ApiError>;
    async fn register(&self, request: RegisterRequest) -> Result<SessionResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
}

/// HTTP client for the backend. Keeps the session cookie between calls.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(check(response).await?).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(check(response).await?).await
    }
}

/// Map non-success statuses onto [`ApiError`], using the `{ "error": ... }` body when present
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.error)
        .unwrap_or(text);
    warn!("Request failed with {}: {}", status, message);

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::CONFLICT => ApiError::Conflict(message),
        _ => ApiError::Rejected {
            status: status.as_u16(),
            message,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl RecordApi for ApiClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.get_json("status").await
    }

    async fn fetch_collection(&self, collection: Collection) -> Result<Value, ApiError> {
        self.get_json(collection.path()).await
    }

    async fn send(&self, write: RecordWrite) -> Result<Value, ApiError> {
        let request = match &write {
            RecordWrite::Create { collection, body } => {
                self.client.post(self.url(collection.path())).json(body)
            }
            RecordWrite::Update {
                collection,
                key,
                body,
            } => self
                .client
                .put(self.url(&format!("{}/{}", collection.path(), key)))
                .json(body),
            RecordWrite::Delete { collection, key } => self
                .client
                .delete(self.url(&format!("{}/{}", collection.path(), key))),
        };
        debug!("Sending write to {}", write.collection());

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(check(response).await?).await
    }
}

#[async_trait]
impl IdentityApi for ApiClient {
    async fn check_session(&self) -> Result<SessionResponse, ApiError> {
        match self.get_json::<SessionResponse>("check-session").await {
            Err(ApiError::Unauthorized) => Ok(SessionResponse::anonymous()),
            other => other,
        }
    }

    async fn login(&self, request: LoginRequest) -> Result<SessionResponse, ApiError> {
        self.post_json("login", &request).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<SessionResponse, ApiError> {
        self.post_json("register", &request).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.post_json::<_, Value>("logout", &serde_json::json!({})).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UpdateVitaminDRequest;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::with_base_url("http://example.test/").unwrap();
        assert_eq!(client.base_url(), "http://example.test");
        assert_eq!(client.url("vitamin-d"), "http://example.test/api/vitamin-d");
    }

    #[test]
    fn test_record_write_bodies() {
        let write = RecordWrite::update(
            Collection::VitaminD,
            "2024-03-01",
            &UpdateVitaminDRequest { taken: true },
        )
        .unwrap();
        assert_eq!(write.collection(), Collection::VitaminD);
        match write {
            RecordWrite::Update { key, body, .. } => {
                assert_eq!(key, "2024-03-01");
                assert_eq!(body, serde_json::json!({ "taken": true }));
            }
            other => panic!("unexpected write {other:?}"),
        }
    }

    #[test]
    fn test_auth_failures() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(ApiError::Rejected {
            status: 403,
            message: "no".into()
        }
        .is_auth_failure());
        assert!(!ApiError::NotFound("gone".into()).is_auth_failure());
        assert!(!ApiError::Network("offline".into()).is_auth_failure());
    }
}
