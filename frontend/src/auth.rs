use shared::{BabyInfo, LoginRequest, RegisterRequest, SessionResponse};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::{ApiError, IdentityApi};
use crate::sync::SyncHealth;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Not checked with the server yet
    Unknown,
    LoggedOut,
    LoggedIn {
        username: String,
        baby: Option<BabyInfo>,
    },
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn { .. })
    }
}

impl From<SessionResponse> for AuthState {
    fn from(session: SessionResponse) -> Self {
        match session {
            SessionResponse {
                authenticated: true,
                username,
                baby,
            } => AuthState::LoggedIn {
                username: username.unwrap_or_default(),
                baby,
            },
            _ => AuthState::LoggedOut,
        }
    }
}

/// The caregiver's login state, shared with whoever renders it
#[derive(Clone)]
pub struct AuthSession {
    api: Arc<dyn IdentityApi>,
    state_tx: Arc<watch::Sender<AuthState>>,
}

impl AuthSession {
    pub fn new(api: Arc<dyn IdentityApi>) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Unknown);
        Self {
            api,
            state_tx: Arc::new(state_tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state_tx.borrow().clone()
    }

    fn publish(&self, session: SessionResponse) -> AuthState {
        let state = AuthState::from(session);
        self.state_tx.send_replace(state.clone());
        state
    }

    pub async fn check(&self) -> Result<AuthState, ApiError> {
        let session = self.api.check_session().await?;
        Ok(self.publish(session))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthState, ApiError> {
        info!("Logging in as {}", username);
        let session = self
            .api
            .login(LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(self.publish(session))
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthState, ApiError> {
        info!("Registering {}", request.username);
        let session = self.api.register(request).await?;
        Ok(self.publish(session))
    }

    /// The local state is logged out afterwards even if the server call failed
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.api.logout().await;
        if let Err(e) = &result {
            warn!("Logout request failed: {}", e);
        }
        self.state_tx.send_replace(AuthState::LoggedOut);
        result
    }

    /// Drop to logged out as soon as a sync fetch is refused for lack of a session
    pub fn follow_sync_health(&self, mut health: watch::Receiver<SyncHealth>) -> JoinHandle<()> {
        let state_tx = self.state_tx.clone();
        tokio::spawn(async move {
            while health.changed().await.is_ok() {
                let logged_out = health.borrow_and_update().is_logged_out();
                if logged_out && state_tx.borrow().is_logged_in() {
                    warn!("Session rejected by the server, logging out");
                    state_tx.send_replace(AuthState::LoggedOut);
                }
            }
        })
    }
}
