use chrono::{Duration, NaiveDate};

use crate::services::date_utils::{format_hours_minutes, night_label, trailing_days};
use crate::sync::snapshot::SleepEntry;

pub const SLEEP_DAYS: usize = 3;
pub const SLEEP_WEEK_DAYS: usize = 7;

/// Time asleep, when both endpoints are known and in order
pub fn sleep_duration(night: &SleepEntry) -> Option<Duration> {
    let (bed, wake) = (night.bed_time?, night.wake_time?);
    (wake >= bed).then(|| wake - bed)
}

/// `8h 10m`, or `Incomplete`
pub fn duration_label(night: Option<&SleepEntry>) -> String {
    night
        .and_then(sleep_duration)
        .map(format_hours_minutes)
        .unwrap_or_else(|| "Incomplete".to_string())
}

/// One row of the sleep view
#[derive(Debug, Clone, PartialEq)]
pub struct NightView {
    pub date: NaiveDate,
    pub label: String,
    pub night: Option<SleepEntry>,
    pub duration: String,
}

/// The nights to display, newest first: 3, or 7 in week view
pub fn night_views(nights: &[SleepEntry], today: NaiveDate, week_view: bool) -> Vec<NightView> {
    let count = if week_view { SLEEP_WEEK_DAYS } else { SLEEP_DAYS };
    trailing_days(today, count)
        .into_iter()
        .map(|date| {
            let night = nights.iter().find(|n| n.date == date).cloned();
            NightView {
                date,
                label: night_label(date, today),
                duration: duration_label(night.as_ref()),
                night,
            }
        })
        .collect()
}
