//! Domain records persisted in the record store.
//!
//! Two shapes of activity record exist:
//! - **Event records** (medication, feeding, bath, diaper) are append-only and
//!   addressed by a generated id.
//! - **Daily records** (vitamin D, belly-button, sleep) hold at most one entry
//!   per (baby, calendar day) and are addressed by that day.

pub mod daily;
pub mod events;
pub mod identity;

pub use daily::*;
pub use events::*;
pub use identity::*;

use chrono::{DateTime, NaiveDate, Utc};

/// Append-only record identified by a generated id
pub trait EventRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn baby_id(&self) -> &str;
    /// The instant the event happened (taken-at)
    fn occurred_at(&self) -> DateTime<Utc>;
    /// Refresh the last-modified instant
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Record keyed by calendar day, one per baby and day
pub trait DailyRecord: Clone + Send + Sync + 'static {
    fn date(&self) -> NaiveDate;
    fn baby_id(&self) -> &str;
    fn touch(&mut self, now: DateTime<Utc>);
}
