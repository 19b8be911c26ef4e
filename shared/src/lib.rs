use serde::{Deserialize, Serialize};
use std::fmt;

/// Medication dose as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    /// Drug name, matched against the medication rules on the client
    pub name: String,
    /// When the dose was taken (RFC 3339)
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Last create/update instant stamped by the server (RFC 3339)
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicationRequest {
    /// Client-proposed id, used so an optimistic append can be rolled back by id
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Defaults to the server's current time when absent
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Dose edits only ever change the taken-at instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicationRequest {
    pub timestamp: String,
}

/// Which breast a feeding session used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedingSide {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingSession {
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "breast")]
    pub side: Option<FeedingSide>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedingRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, rename = "breast")]
    pub side: Option<FeedingSide>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedingRequest {
    pub timestamp: String,
    #[serde(default, rename = "breast")]
    pub side: Option<FeedingSide>,
    #[serde(default)]
    pub note: Option<String>,
}

/// One vitamin D record per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitaminDRecord {
    /// Calendar day (YYYY-MM-DD), the natural key
    #[serde(default)]
    pub date: Option<String>,
    pub taken: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertVitaminDRequest {
    pub date: String,
    pub taken: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVitaminDRequest {
    pub taken: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BathRecord {
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBathRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBathRequest {
    pub timestamp: String,
}

/// Belly-button cleaning for one calendar day, two independent flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BellyButtonRecord {
    #[serde(default)]
    pub date: Option<String>,
    pub morning: bool,
    pub evening: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBellyButtonRequest {
    pub date: String,
    pub morning: bool,
    pub evening: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBellyButtonRequest {
    pub morning: bool,
    pub evening: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiaperType {
    Pee,
    Poo,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperChange {
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type")]
    pub diaper_type: DiaperType,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiaperRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type")]
    pub diaper_type: DiaperType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiaperRequest {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub diaper_type: DiaperType,
}

/// One sleep interval, keyed by the date the night started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    #[serde(default)]
    pub date: Option<String>,
    /// `null` until the caregiver sets it
    #[serde(default)]
    pub bed_time: Option<String>,
    #[serde(default)]
    pub wake_time: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSleepRequest {
    pub date: String,
    #[serde(default)]
    pub bed_time: Option<String>,
    #[serde(default)]
    pub wake_time: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSleepRequest {
    #[serde(default)]
    pub bed_time: Option<String>,
    #[serde(default)]
    pub wake_time: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Full per-baby snapshot returned by `GET /api/status`.
///
/// Diapers are pre-filtered to the last 3 days and sleep to the last 7 days;
/// the other collections are unfiltered. Missing keys decode as empty lists.
/// A record that does not decode is skipped so it cannot take its
/// collection down with it; null or missing instants decode as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub medications: Vec<Medication>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub feedings: Vec<FeedingSession>,
    #[serde(default, rename = "vitaminD", deserialize_with = "skip_malformed")]
    pub vitamin_d: Vec<VitaminDRecord>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub baths: Vec<BathRecord>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub belly_button: Vec<BellyButtonRecord>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub diapers: Vec<DiaperChange>,
    #[serde(default, deserialize_with = "skip_malformed")]
    pub sleep: Vec<SleepRecord>,
}

fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed record: {}", e);
                None
            }
        })
        .collect())
}

/// The record collections exposed by the Record Access API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Medications,
    Feedings,
    VitaminD,
    Baths,
    BellyButton,
    Diapers,
    Sleep,
}

impl Collection {
    /// Path segment under `/api`
    pub fn path(self) -> &'static str {
        match self {
            Collection::Medications => "medications",
            Collection::Feedings => "feedings",
            Collection::VitaminD => "vitamin-d",
            Collection::Baths => "baths",
            Collection::BellyButton => "belly-button",
            Collection::Diapers => "diapers",
            Collection::Sleep => "sleep",
        }
    }

    /// Day-keyed collections are addressed by `YYYY-MM-DD` instead of a generated id
    pub fn is_day_keyed(self) -> bool {
        matches!(
            self,
            Collection::VitaminD | Collection::BellyButton | Collection::Sleep
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Baby display info returned with a live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BabyInfo {
    pub id: String,
    pub name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub baby_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub invitation_code: String,
}

/// Answer of `GET /api/check-session` and of a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baby: Option<BabyInfo>,
}

impl SessionResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            username: None,
            baby: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Deletes are idempotent; `deleted` tells whether a record was actually removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Format used for every calendar-day key
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats a calendar day as a `YYYY-MM-DD` key
pub fn day_key(date: chrono::NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` key
pub fn parse_day_key(key: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}
