use futures::future::{BoxFuture, FutureExt};
use shared::Collection;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::change::{Change, TrackedRecord};
use crate::services::{ApiError, RecordApi, RecordWrite};
use crate::sync::{DataSynchronizer, SyncError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MutationError {
    #[error("synchronizer has been shut down")]
    TornDown,
    #[error("no local {collection} record with key {key}")]
    UnknownRecord { collection: Collection, key: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<SyncError> for MutationError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::TornDown => MutationError::TornDown,
            SyncError::Api(e) => MutationError::Api(e),
        }
    }
}

/// A local change together with the server write that makes it durable
pub struct MutationCommand<T> {
    pub change: Change<T>,
    pub remote: BoxFuture<'static, Result<(), ApiError>>,
}

impl<T: TrackedRecord> MutationCommand<T> {
    /// Command whose remote half sends `write` through `api`
    pub fn write(api: &Arc<dyn RecordApi>, change: Change<T>, write: RecordWrite) -> Self {
        let api = api.clone();
        let remote = async move { api.send(write).await.map(|_| ()) }.boxed();
        Self { change, remote }
    }
}

/// Applies changes locally first, then confirms them with the server.
///
/// On a failed write the inverse change is applied and the error returned.
/// Either way the snapshot is then refetched: on success so server-stamped
/// fields replace the local guesses, on failure because overlapping writes
/// to the same record can leave the rolled-back state matching neither side.
#[derive(Clone)]
pub struct OptimisticPipeline {
    sync: Arc<DataSynchronizer>,
}

impl OptimisticPipeline {
    pub fn new(sync: Arc<DataSynchronizer>) -> Self {
        Self { sync }
    }

    pub fn synchronizer(&self) -> &Arc<DataSynchronizer> {
        &self.sync
    }

    pub async fn submit<T: TrackedRecord>(
        &self,
        command: MutationCommand<T>,
    ) -> Result<(), MutationError> {
        let MutationCommand { change, remote } = command;
        let key = change.key();

        self.sync.apply_local(|snapshot| change.apply(snapshot))?;
        debug!("Applied local {} change for {}", T::COLLECTION, key);

        match remote.await {
            Ok(()) => {
                info!("Confirmed {} change for {}", T::COLLECTION, key);
                if let Err(e) = self.sync.refresh_now().await {
                    debug!("Refresh after {} change failed: {}", T::COLLECTION, e);
                }
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Rolling back {} change for {}: {}",
                    T::COLLECTION,
                    key,
                    e
                );
                let inverse = change.inverse();
                if self
                    .sync
                    .apply_local(|snapshot| inverse.apply(snapshot))
                    .is_err()
                {
                    debug!("Synchronizer shut down before rollback");
                    return Err(MutationError::Api(e));
                }
                if let Err(refresh) = self.sync.refresh_now().await {
                    debug!("Refresh after failed {} change failed: {}", T::COLLECTION, refresh);
                }
                Err(MutationError::Api(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::snapshot::MedicationEntry;
    use crate::test_utils::{wire_medication, FakeApi};
    use chrono::{TimeZone, Utc};
    use shared::StatusSnapshot;

    fn dose(id: &str) -> MedicationEntry {
        MedicationEntry {
            id: id.to_string(),
            name: "Alvedon".to_string(),
            taken_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn setup() -> (Arc<FakeApi>, Arc<dyn RecordApi>, OptimisticPipeline) {
        let fake = Arc::new(FakeApi::new());
        let api: Arc<dyn RecordApi> = fake.clone();
        let sync = Arc::new(DataSynchronizer::new(api.clone()));
        (fake, api, OptimisticPipeline::new(sync))
    }

    #[tokio::test]
    async fn test_change_is_visible_before_the_write_completes() {
        let (fake, api, pipeline) = setup();
        fake.gate_writes(true);

        let submitted = tokio::spawn({
            let pipeline = pipeline.clone();
            let command = MutationCommand::write(
                &api,
                Change::Insert(dose("m1")),
                RecordWrite::delete(Collection::Medications, "unused"),
            );
            async move { pipeline.submit(command).await }
        });
        fake.wait_for_pending_writes(1).await;

        assert_eq!(pipeline.synchronizer().snapshot().medications.len(), 1);

        fake.release_write(0, Ok(serde_json::json!({ "success": true })));
        submitted.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_failed_insert_is_rolled_back() {
        let (fake, api, pipeline) = setup();
        fake.fail_writes(Some(ApiError::Network("offline".to_string())));

        let command = MutationCommand::write(
            &api,
            Change::Insert(dose("m1")),
            RecordWrite::delete(Collection::Medications, "unused"),
        );
        let result = pipeline.submit(command).await;

        assert!(matches!(result, Err(MutationError::Api(ApiError::Network(_)))));
        assert!(pipeline.synchronizer().snapshot().medications.is_empty());
    }

    #[tokio::test]
    async fn test_failure_refetches_server_state() {
        let (fake, api, pipeline) = setup();
        fake.set_status(StatusSnapshot {
            medications: vec![wire_medication("server-id", "Alvedon", "2024-03-01T08:00:00.000Z")],
            ..Default::default()
        });
        fake.fail_writes(Some(ApiError::Network("offline".to_string())));

        let command = MutationCommand::write(
            &api,
            Change::Insert(dose("m1")),
            RecordWrite::delete(Collection::Medications, "unused"),
        );
        assert!(pipeline.submit(command).await.is_err());

        let snapshot = pipeline.synchronizer().snapshot();
        assert_eq!(snapshot.medications.len(), 1);
        assert_eq!(snapshot.medications[0].id, "server-id");
        assert_eq!(fake.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_success_refetches_server_state() {
        let (fake, api, pipeline) = setup();
        fake.set_status(StatusSnapshot {
            medications: vec![wire_medication("server-id", "Alvedon", "2024-03-01T08:00:00.000Z")],
            ..Default::default()
        });

        let command = MutationCommand::write(
            &api,
            Change::Insert(dose("m1")),
            RecordWrite::delete(Collection::Medications, "unused"),
        );
        pipeline.submit(command).await.unwrap();

        let snapshot = pipeline.synchronizer().snapshot();
        assert_eq!(snapshot.medications.len(), 1);
        assert_eq!(snapshot.medications[0].id, "server-id");
        assert_eq!(fake.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_touches_nothing() {
        let (fake, api, pipeline) = setup();
        pipeline.synchronizer().shutdown().await;

        let command = MutationCommand::write(
            &api,
            Change::Insert(dose("m1")),
            RecordWrite::delete(Collection::Medications, "unused"),
        );
        let result = pipeline.submit(command).await;

        assert_eq!(result, Err(MutationError::TornDown));
        assert!(fake.writes().is_empty());
    }
}
