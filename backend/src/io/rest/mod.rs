//! # REST API Interface Layer
//!
//! HTTP endpoints of the baby tracker, all nested under `/api`.
//!
//! - **auth_apis**: register, login, logout, check-session
//! - **status_apis**: the per-baby snapshot polled by the client
//! - **\*_apis**: list / create / update / delete per collection
//! - **mappers**: wire DTO <-> domain record conversion and validation
//! - **session**: cookie parsing and the `CurrentSession` extractor
//! - **error**: domain error to HTTP status translation
//!
//! Every collection endpoint requires a session and is scoped to the
//! session's baby. Records of another baby answer 404.

pub mod auth_apis;
pub mod bath_apis;
pub mod belly_button_apis;
pub mod diaper_apis;
pub mod error;
pub mod feeding_apis;
pub mod mappers;
pub mod medication_apis;
pub mod session;
pub mod sleep_apis;
pub mod status_apis;
pub mod vitamin_d_apis;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::DomainResult;

/// `?since=` filter accepted by every list endpoint
#[derive(Deserialize, Debug, Default)]
pub struct SinceQuery {
    pub since: Option<String>,
}

/// Event collections filter by instant (RFC 3339)
pub fn parse_since_instant(query: &SinceQuery) -> DomainResult<Option<DateTime<Utc>>> {
    mappers::parse_optional_instant("since", query.since.as_deref())
}

/// Day collections filter by calendar day (YYYY-MM-DD)
pub fn parse_since_date(query: &SinceQuery) -> DomainResult<Option<NaiveDate>> {
    query.since.as_deref().map(mappers::parse_date).transpose()
}

#[cfg(test)]
mod api_tests;
