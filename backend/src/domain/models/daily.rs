use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::DailyRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitaminDDay {
    pub baby_id: String,
    pub date: NaiveDate,
    pub taken: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BellyButtonDay {
    pub baby_id: String,
    pub date: NaiveDate,
    pub morning: bool,
    pub evening: bool,
    pub updated_at: DateTime<Utc>,
}

/// One night of sleep, keyed by the date the night started.
/// Either endpoint may be set before the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepNight {
    pub baby_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub bed_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub wake_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

macro_rules! impl_daily_record {
    ($($record:ty),+ $(,)?) => {
        $(
            impl DailyRecord for $record {
                fn date(&self) -> NaiveDate {
                    self.date
                }

                fn baby_id(&self) -> &str {
                    &self.baby_id
                }

                fn touch(&mut self, now: DateTime<Utc>) {
                    self.updated_at = now;
                }
            }
        )+
    };
}

impl_daily_record!(VitaminDDay, BellyButtonDay, SleepNight);
