//! # Mutations Module
//!
//! Caregiver actions applied optimistically to the local snapshot and then
//! confirmed with the server.
//!
//! - **change**: `TrackedRecord` and reversible `Change` values
//! - **pipeline**: `OptimisticPipeline`, apply/confirm/rollback
//! - **actions**: `CareActions`, one method per caregiver action

pub mod actions;
pub mod change;
pub mod pipeline;

pub use actions::{CareActions, CleaningSlot};
pub use change::{Change, TrackedRecord};
pub use pipeline::{MutationCommand, MutationError, OptimisticPipeline};
