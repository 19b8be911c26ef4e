//! # Sync Module
//!
//! Keeps the client's view of the server state current by polling.
//!
//! - **periodic_refresh**: the cancellable interval task every poller runs on
//! - **snapshot**: typed mirror of `GET /status` and wire normalization
//! - **synchronizer**: `DataSynchronizer`, the sequenced owner of the snapshot
//! - **collection**: `CollectionWatcher`, polling one collection on its own

pub mod collection;
pub mod periodic_refresh;
pub mod snapshot;
pub mod synchronizer;

pub use collection::CollectionWatcher;
pub use periodic_refresh::{PeriodicRefreshConfig, PeriodicTask};
pub use snapshot::TrackedSnapshot;
pub use synchronizer::{DataSynchronizer, SyncError, SyncHealth};
