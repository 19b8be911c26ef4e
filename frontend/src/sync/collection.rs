use shared::Collection;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::periodic_refresh::{PeriodicRefreshConfig, PeriodicTask};
use super::snapshot::{normalize, WireRecord};
use crate::services::{ApiError, RecordApi};

/// The records channel plus the stop flag checked under the same lock
struct Published<T> {
    stopped: Mutex<bool>,
    records_tx: watch::Sender<Arc<Vec<T>>>,
}

impl<T> Published<T> {
    fn new() -> Self {
        let (records_tx, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            stopped: Mutex::new(false),
            records_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `false` when the watcher was stopped and nothing was published
    fn publish(&self, records: Vec<T>) -> bool {
        let stopped = self.lock();
        if *stopped {
            return false;
        }
        self.records_tx.send_replace(Arc::new(records));
        true
    }

    fn stop(&self) {
        *self.lock() = true;
    }
}

/// Polls a single `GET /X` collection, independently of the status snapshot
/// and of other watchers.
pub struct CollectionWatcher<T: WireRecord> {
    collection: Collection,
    published: Arc<Published<T>>,
    poller: Option<PeriodicTask>,
}

async fn fetch<T: WireRecord>(api: &dyn RecordApi, collection: Collection) -> Result<Vec<T>, ApiError> {
    let body = api.fetch_collection(collection).await?;
    let raw: Vec<serde_json::Value> =
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    // One bad record is skipped, not the whole collection
    let wire = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T::Wire>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed {} record: {}", collection, e);
                None
            }
        })
        .collect();
    Ok(normalize(wire))
}

impl<T> CollectionWatcher<T>
where
    T: WireRecord + Send + Sync + 'static,
{
    pub fn start(
        api: Arc<dyn RecordApi>,
        collection: Collection,
        config: PeriodicRefreshConfig,
    ) -> Self {
        let published = Arc::new(Published::new());

        let poller = PeriodicTask::spawn("collection poller", config, {
            let published = published.clone();
            move || {
                let api = api.clone();
                let published = published.clone();
                async move {
                    match fetch::<T>(api.as_ref(), collection).await {
                        Ok(records) => {
                            let count = records.len();
                            if published.publish(records) {
                                debug!("Fetched {} {} records", count, collection);
                            } else {
                                debug!("Discarding {} records fetched after stop", collection);
                            }
                        }
                        Err(e) => warn!("Refreshing {} failed, keeping previous records: {}", collection, e),
                    }
                }
            }
        });

        Self {
            collection,
            published,
            poller: Some(poller),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<T>>> {
        self.published.records_tx.subscribe()
    }

    pub fn records(&self) -> Arc<Vec<T>> {
        self.published.records_tx.borrow().clone()
    }

    pub async fn stop(mut self) {
        self.published.stop();
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }
}

impl<T: WireRecord> Drop for CollectionWatcher<T> {
    fn drop(&mut self) {
        self.published.stop();
    }
}
