//! # Domain Module
//!
//! Business rules of the baby tracker backend, independent of HTTP.
//!
//! - **event_log_service**: generic CRUD over the append-only event collections
//! - **daily_record_service**: generic CRUD over the day-keyed collections
//! - **status_service**: the windowed per-baby snapshot
//! - **account_service**: invitation-gated registration and credential checks
//! - **session_service**: opaque session tokens resolving to an owning baby
//!
//! Every record operation takes the caller's baby id; services never return
//! or modify another baby's records.

pub mod account_service;
pub mod commands;
pub mod daily_record_service;
pub mod errors;
pub mod event_log_service;
pub mod models;
pub mod session_service;
pub mod status_service;

pub use account_service::AccountService;
pub use daily_record_service::DailyRecordService;
pub use errors::{DomainError, DomainResult};
pub use event_log_service::EventLogService;
pub use session_service::{Session, SessionService};
pub use status_service::{BabyStatus, StatusService};
