use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use shared::DiaperType;

use super::care::Indicator;
use crate::services::date_utils::{local_date, trailing_days};
use crate::sync::snapshot::DiaperEntry;

/// Longer than this without a change turns the indicator to warning
pub const DIAPER_RECENCY_HOURS: i64 = 4;
pub const DIAPER_STATS_DAYS: usize = 3;

/// Changes of one local calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStats {
    pub date: NaiveDate,
    pub pee: usize,
    pub poo: usize,
    pub both: usize,
    pub total: usize,
}

impl DayStats {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            pee: 0,
            poo: 0,
            both: 0,
            total: 0,
        }
    }

    fn count(&mut self, diaper_type: DiaperType) {
        match diaper_type {
            DiaperType::Pee => self.pee += 1,
            DiaperType::Poo => self.poo += 1,
            DiaperType::Both => self.both += 1,
        }
        self.total += 1;
    }
}

pub fn latest_change(diapers: &[DiaperEntry]) -> Option<DateTime<Utc>> {
    diapers.iter().map(|d| d.taken_at).max()
}

pub fn diaper_indicator(diapers: &[DiaperEntry], now: DateTime<Utc>) -> Indicator {
    match latest_change(diapers) {
        Some(last) if now - last <= Duration::hours(DIAPER_RECENCY_HOURS) => Indicator::Success,
        _ => Indicator::Warning,
    }
}

/// Per-day counts for the `days` days ending today, newest first.
///
/// Days without changes are present with zero counts.
pub fn day_stats(diapers: &[DiaperEntry], now: &DateTime<FixedOffset>, days: usize) -> Vec<DayStats> {
    let mut stats: Vec<DayStats> = trailing_days(now.date_naive(), days)
        .into_iter()
        .map(DayStats::empty)
        .collect();

    for diaper in diapers {
        let date = local_date(diaper.taken_at, now);
        if let Some(day) = stats.iter_mut().find(|day| day.date == date) {
            day.count(diaper.diaper_type);
        }
    }
    stats
}
