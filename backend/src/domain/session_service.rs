use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// A logged-in caregiver, resolved from the session cookie
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub account_id: String,
    pub username: String,
    pub baby_id: String,
    pub expires_at: DateTime<Utc>,
}

/// In-memory session table keyed by opaque token.
///
/// Sessions do not survive a restart; caregivers log in again.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a session and return its token
    pub async fn start(&self, account_id: &str, username: &str, baby_id: &str) -> String {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let session = Session {
            account_id: account_id.to_string(),
            username: username.to_string(),
            baby_id: baby_id.to_string(),
            expires_at: Utc::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(token.clone(), session);
        info!("Started session for account {} ({} active)", account_id, sessions.len());
        token
    }

    /// Resolve a token to its live session. Expired sessions are dropped.
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned()?;
        if session.expires_at <= Utc::now() {
            debug!("Session for account {} expired", session.account_id);
            self.sessions.write().await.remove(token);
            return None;
        }
        Some(session)
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn end(&self, token: &str) {
        if let Some(session) = self.sessions.write().await.remove(token) {
            info!("Ended session for account {}", session.account_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_resolve_end() {
        let service = SessionService::new(Duration::days(30));
        let token = service.start("a1", "parent", "b1").await;

        let session = service.resolve(&token).await.unwrap();
        assert_eq!(session.baby_id, "b1");
        assert!(session.expires_at > Utc::now() + Duration::days(29));

        service.end(&token).await;
        assert!(service.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_does_not_resolve() {
        let service = SessionService::new(Duration::seconds(-1));
        let token = service.start("a1", "parent", "b1").await;
        assert!(service.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_does_not_resolve() {
        let service = SessionService::new(Duration::days(1));
        assert!(service.resolve("nope").await.is_none());
    }
}
