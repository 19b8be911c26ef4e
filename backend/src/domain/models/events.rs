use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{DiaperType, FeedingSide};

use super::EventRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDose {
    pub id: String,
    pub baby_id: String,
    pub name: String,
    #[serde(rename = "timestamp")]
    pub taken_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingSession {
    pub id: String,
    pub baby_id: String,
    #[serde(rename = "timestamp")]
    pub taken_at: DateTime<Utc>,
    #[serde(default, rename = "breast")]
    pub side: Option<FeedingSide>,
    #[serde(default)]
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bath {
    pub id: String,
    pub baby_id: String,
    #[serde(rename = "timestamp")]
    pub taken_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperChange {
    pub id: String,
    pub baby_id: String,
    #[serde(rename = "timestamp")]
    pub taken_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub diaper_type: DiaperType,
    pub updated_at: DateTime<Utc>,
}

macro_rules! impl_event_record {
    ($($record:ty),+ $(,)?) => {
        $(
            impl EventRecord for $record {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: String) {
                    self.id = id;
                }

                fn baby_id(&self) -> &str {
                    &self.baby_id
                }

                fn occurred_at(&self) -> DateTime<Utc> {
                    self.taken_at
                }

                fn touch(&mut self, now: DateTime<Utc>) {
                    self.updated_at = now;
                }
            }
        )+
    };
}

impl_event_record!(MedicationDose, FeedingSession, Bath, DiaperChange);
