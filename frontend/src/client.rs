use std::sync::Arc;

use crate::auth::AuthSession;
use crate::mutations::CareActions;
use crate::services::{ApiClient, ApiError, IdentityApi, RecordApi};
use crate::status::{StatusBoard, DEFAULT_RULES};
use crate::sync::{DataSynchronizer, PeriodicRefreshConfig};
use chrono::Local;
use tokio::task::JoinHandle;

/// Everything a UI needs, wired to one backend.
///
/// Polling starts on [`connect`](Self::connect) and stops on
/// [`shutdown`](Self::shutdown) or drop.
pub struct TrackerClient {
    pub auth: AuthSession,
    pub sync: Arc<DataSynchronizer>,
    pub actions: CareActions,
    auth_follower: JoinHandle<()>,
}

impl TrackerClient {
    pub fn connect(base_url: &str, config: PeriodicRefreshConfig) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::with_base_url(base_url)?);
        Ok(Self::with_api(api, config))
    }

    pub fn with_api<A>(api: Arc<A>, config: PeriodicRefreshConfig) -> Self
    where
        A: RecordApi + IdentityApi + 'static,
    {
        let records: Arc<dyn RecordApi> = api.clone();
        let sync = Arc::new(DataSynchronizer::start(records.clone(), config));
        let auth = AuthSession::new(api);
        let auth_follower = auth.follow_sync_health(sync.health());

        Self {
            actions: CareActions::new(records, sync.clone()),
            auth,
            sync,
            auth_follower,
        }
    }

    /// Indicators for the current snapshot at the local wall clock
    pub fn status_board(&self) -> StatusBoard {
        StatusBoard::compute(&self.sync.snapshot(), DEFAULT_RULES, &Local::now().fixed_offset())
    }

    pub async fn shutdown(self) {
        self.sync.shutdown().await;
        self.auth_follower.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeApi;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_client_polls_until_shutdown() {
        let api = Arc::new(FakeApi::new());
        let client = TrackerClient::with_api(api.clone(), PeriodicRefreshConfig::default());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(api.fetch_count(), 1);
        assert_eq!(client.status_board().nights.len(), 3);

        client.shutdown().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.fetch_count(), 1);
    }
}
