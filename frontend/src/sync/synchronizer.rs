use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::periodic_refresh::{PeriodicRefreshConfig, PeriodicTask};
use super::snapshot::TrackedSnapshot;
use crate::services::{ApiError, RecordApi};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("synchronizer has been shut down")]
    TornDown,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Outcome of recent fetches, published beside the snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncHealth {
    pub consecutive_failures: u32,
    pub last_error: Option<ApiError>,
    pub last_success: Option<DateTime<Utc>>,
}

impl SyncHealth {
    /// The last fetch was refused because the session is gone
    pub fn is_logged_out(&self) -> bool {
        self.consecutive_failures > 0
            && self.last_error.as_ref().is_some_and(ApiError::is_auth_failure)
    }
}

struct SyncState {
    torn_down: bool,
    /// Sequence number of the last change published, fetched or local
    applied_seq: u64,
}

struct Shared {
    api: Arc<dyn RecordApi>,
    state: Mutex<SyncState>,
    next_seq: AtomicU64,
    snapshot_tx: watch::Sender<Arc<TrackedSnapshot>>,
    health_tx: watch::Sender<SyncHealth>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        // The guarded state is two plain fields that are never left half-written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn claim_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn refresh(&self) -> Result<bool, SyncError> {
        if self.lock().torn_down {
            return Err(SyncError::TornDown);
        }
        let seq = self.claim_seq();
        debug!("Fetching status snapshot #{}", seq);

        let result = self.api.fetch_status().await;

        let mut state = self.lock();
        if state.torn_down {
            debug!("Discarding snapshot #{} that arrived after shutdown", seq);
            return Err(SyncError::TornDown);
        }

        match result {
            Ok(wire) => {
                self.health_tx.send_modify(|health| {
                    health.consecutive_failures = 0;
                    health.last_error = None;
                    health.last_success = Some(Utc::now());
                });
                if seq <= state.applied_seq {
                    debug!(
                        "Discarding snapshot #{}, #{} is already applied",
                        seq, state.applied_seq
                    );
                    return Ok(false);
                }
                state.applied_seq = seq;
                self.snapshot_tx
                    .send_replace(Arc::new(TrackedSnapshot::from_wire(wire)));
                Ok(true)
            }
            Err(e) => {
                warn!("Status refresh failed, keeping previous snapshot: {}", e);
                self.health_tx.send_modify(|health| {
                    health.consecutive_failures += 1;
                    health.last_error = Some(e.clone());
                });
                Err(SyncError::Api(e))
            }
        }
    }
}

/// Keeps a local mirror of the caller's status snapshot.
///
/// Every fetch replaces the snapshot wholesale and is published as one
/// `Arc<TrackedSnapshot>`, so subscribers never see a mix of two fetches.
/// Fetches are numbered when they start; a result older than the last
/// published change is dropped. After [`shutdown`](Self::shutdown) nothing
/// is published anymore, including responses that were already in flight.
pub struct DataSynchronizer {
    shared: Arc<Shared>,
    poller: Mutex<Option<PeriodicTask>>,
}

impl DataSynchronizer {
    /// A synchronizer that only fetches when asked to
    pub fn new(api: Arc<dyn RecordApi>) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(TrackedSnapshot::default()));
        let (health_tx, _) = watch::channel(SyncHealth::default());

        Self {
            shared: Arc::new(Shared {
                api,
                state: Mutex::new(SyncState {
                    torn_down: false,
                    applied_seq: 0,
                }),
                next_seq: AtomicU64::new(0),
                snapshot_tx,
                health_tx,
            }),
            poller: Mutex::new(None),
        }
    }

    /// Fetch immediately, then again on every interval until shut down
    pub fn start(api: Arc<dyn RecordApi>, config: PeriodicRefreshConfig) -> Self {
        let synchronizer = Self::new(api);
        info!("Starting status polling every {:?}", config.interval);

        let shared = synchronizer.shared.clone();
        let task = PeriodicTask::spawn("status poller", config, move || {
            let shared = shared.clone();
            async move {
                // Failures are already logged and reflected in the health channel
                let _ = shared.refresh().await;
            }
        });
        *synchronizer.lock_poller() = Some(task);
        synchronizer
    }

    fn lock_poller(&self) -> MutexGuard<'_, Option<PeriodicTask>> {
        self.poller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<TrackedSnapshot>> {
        self.shared.snapshot_tx.subscribe()
    }

    pub fn health(&self) -> watch::Receiver<SyncHealth> {
        self.shared.health_tx.subscribe()
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<TrackedSnapshot> {
        self.shared.snapshot_tx.borrow().clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.lock().torn_down
    }

    /// Fetch now. `Ok(false)` means a newer change won and the result was dropped.
    pub async fn refresh_now(&self) -> Result<bool, SyncError> {
        self.shared.refresh().await
    }

    /// Change the local snapshot without asking the server.
    ///
    /// Fetches that started before this call can no longer replace the result.
    pub fn apply_local<R>(
        &self,
        change: impl FnOnce(&mut TrackedSnapshot) -> R,
    ) -> Result<R, SyncError> {
        let mut state = self.shared.lock();
        if state.torn_down {
            return Err(SyncError::TornDown);
        }
        state.applied_seq = self.shared.claim_seq();

        let mut next = TrackedSnapshot::clone(&self.shared.snapshot_tx.borrow());
        let result = change(&mut next);
        self.shared.snapshot_tx.send_replace(Arc::new(next));
        Ok(result)
    }

    /// Stop polling and wait for the poller to exit. Idempotent.
    pub async fn shutdown(&self) {
        {
            let mut state = self.shared.lock();
            if !state.torn_down {
                info!("Stopping status synchronizer");
            }
            state.torn_down = true;
        }
        let poller = self.lock_poller().take();
        if let Some(task) = poller {
            task.stop().await;
        }
    }
}

impl Drop for DataSynchronizer {
    fn drop(&mut self) {
        self.shared.lock().torn_down = true;
    }
}
