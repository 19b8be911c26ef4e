//! Client core of the baby tracker.
//!
//! UI-agnostic: it keeps a polled mirror of the caregiver's records, applies
//! caregiver actions optimistically and derives the status indicators. The
//! host application renders the state and installs a `tracing` subscriber.

pub mod auth;
pub mod client;
pub mod mutations;
pub mod services;
pub mod status;
pub mod sync;

#[cfg(test)]
mod test_utils;

pub use auth::{AuthSession, AuthState};
pub use client::TrackerClient;
pub use mutations::{CareActions, MutationError};
pub use services::{ApiClient, ApiError};
pub use status::StatusBoard;
pub use sync::{DataSynchronizer, PeriodicRefreshConfig, SyncHealth, TrackedSnapshot};
