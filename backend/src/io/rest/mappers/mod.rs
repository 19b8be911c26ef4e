//! Conversions between the shared wire DTOs and the domain records.
//!
//! Request mappers validate and parse; response mappers never fail.

pub mod auth_mapper;
pub mod daily_mappers;
pub mod event_mappers;
pub mod status_mapper;

pub use auth_mapper::AuthMapper;
pub use daily_mappers::{BellyButtonMapper, SleepMapper, VitaminDMapper};
pub use event_mappers::{BathMapper, DiaperMapper, FeedingMapper, MedicationMapper};
pub use status_mapper::StatusMapper;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

const MAX_ID_LENGTH: usize = 64;

pub fn parse_instant(field: &str, raw: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::validation(format!("{field} must be an RFC 3339 timestamp")))
}

pub fn parse_optional_instant(
    field: &str,
    raw: Option<&str>,
) -> DomainResult<Option<DateTime<Utc>>> {
    raw.map(|raw| parse_instant(field, raw)).transpose()
}

/// Taken-at from a create request, the server clock when absent
pub fn instant_or_now(raw: Option<&str>, now: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
    Ok(parse_optional_instant("timestamp", raw)?.unwrap_or(now))
}

pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    shared::parse_day_key(raw.trim())
        .ok_or_else(|| DomainError::validation("date must be formatted YYYY-MM-DD"))
}

pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The client-proposed id, or a fresh uuid when none was proposed
pub fn resolve_event_id(proposed: Option<String>) -> DomainResult<String> {
    match proposed.map(|id| id.trim().to_string()) {
        Some(id) if id.is_empty() => Err(DomainError::validation("id cannot be empty")),
        Some(id) if id.len() > MAX_ID_LENGTH => Err(DomainError::validation(format!(
            "id cannot exceed {MAX_ID_LENGTH} characters"
        ))),
        Some(id) => Ok(id),
        None => Ok(Uuid::new_v4().to_string()),
    }
}
