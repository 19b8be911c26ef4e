use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};

use crate::services::date_utils::trailing_days;
use crate::sync::snapshot::{BathEntry, BellyButtonEntry, VitaminDEntry};

/// Traffic-light state of a daily care indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Success,
    Warning,
    Danger,
}

pub const BATH_WARNING_DAYS: f64 = 5.0;
pub const BATH_DANGER_DAYS: f64 = 7.0;
/// Local hour from which the evening cleaning is also expected
pub const EVENING_HOUR: u32 = 17;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn vitamin_d_indicator(records: &[VitaminDEntry], now: &DateTime<FixedOffset>) -> Indicator {
    let today = now.date_naive();
    match records.iter().find(|r| r.date == today) {
        Some(record) if record.taken => Indicator::Success,
        _ => Indicator::Danger,
    }
}

pub fn latest_bath(baths: &[BathEntry]) -> Option<DateTime<Utc>> {
    baths.iter().map(|bath| bath.taken_at).max()
}

/// Fractional days since the latest bath
pub fn days_since_bath(baths: &[BathEntry], now: DateTime<Utc>) -> Option<f64> {
    latest_bath(baths).map(|last| (now - last).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY)
}

pub fn bath_indicator(baths: &[BathEntry], now: DateTime<Utc>) -> Indicator {
    match days_since_bath(baths, now) {
        None => Indicator::Danger,
        Some(days) if days > BATH_DANGER_DAYS => Indicator::Danger,
        Some(days) if days > BATH_WARNING_DAYS => Indicator::Warning,
        Some(_) => Indicator::Success,
    }
}

pub fn belly_button_indicator(
    records: &[BellyButtonEntry],
    now: &DateTime<FixedOffset>,
) -> Indicator {
    let today = now.date_naive();
    let Some(record) = records.iter().find(|r| r.date == today) else {
        return Indicator::Danger;
    };
    if !record.morning {
        return Indicator::Danger;
    }
    if now.hour() >= EVENING_HOUR && !record.evening {
        return Indicator::Danger;
    }
    Indicator::Success
}

/// The last `count` days ending today, newest first, with "not taken" for missing days
pub fn vitamin_d_days(records: &[VitaminDEntry], today: NaiveDate, count: usize) -> Vec<VitaminDEntry> {
    trailing_days(today, count)
        .into_iter()
        .map(|date| {
            records
                .iter()
                .find(|r| r.date == date)
                .cloned()
                .unwrap_or(VitaminDEntry {
                    date,
                    taken: false,
                    updated_at: None,
                })
        })
        .collect()
}

/// The last `count` days ending today, newest first, with both cleanings unset for missing days
pub fn belly_button_days(
    records: &[BellyButtonEntry],
    today: NaiveDate,
    count: usize,
) -> Vec<BellyButtonEntry> {
    trailing_days(today, count)
        .into_iter()
        .map(|date| {
            records
                .iter()
                .find(|r| r.date == date)
                .cloned()
                .unwrap_or(BellyButtonEntry {
                    date,
                    morning: false,
                    evening: false,
                    updated_at: None,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn local(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, hour, 0, 0)
            .unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn bath_ago(now: DateTime<Utc>, days: i64) -> BathEntry {
        BathEntry {
            id: format!("b{}", days),
            taken_at: now - Duration::days(days),
            updated_at: None,
        }
    }

    fn belly(day: u32, morning: bool, evening: bool) -> BellyButtonEntry {
        BellyButtonEntry {
            date: date(day),
            morning,
            evening,
            updated_at: None,
        }
    }

    #[test]
    fn test_bath_staleness_boundaries() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(bath_indicator(&[bath_ago(now, 5)], now), Indicator::Success);
        assert_eq!(bath_indicator(&[bath_ago(now, 6)], now), Indicator::Warning);
        assert_eq!(bath_indicator(&[bath_ago(now, 8)], now), Indicator::Danger);
        assert_eq!(bath_indicator(&[], now), Indicator::Danger);
        // Only the latest bath counts
        assert_eq!(
            bath_indicator(&[bath_ago(now, 8), bath_ago(now, 1)], now),
            Indicator::Success
        );
    }

    #[test]
    fn test_vitamin_d_only_counts_today() {
        let now = local(5, 9);
        let yesterday = VitaminDEntry {
            date: date(4),
            taken: true,
            updated_at: None,
        };
        assert_eq!(vitamin_d_indicator(&[yesterday.clone()], &now), Indicator::Danger);

        let today = VitaminDEntry {
            date: date(5),
            taken: true,
            updated_at: None,
        };
        assert_eq!(vitamin_d_indicator(&[yesterday, today], &now), Indicator::Success);
    }

    #[test]
    fn test_belly_button_evening_rule() {
        let morning_only = [belly(5, true, false)];
        assert_eq!(belly_button_indicator(&morning_only, &local(5, 16)), Indicator::Success);
        assert_eq!(belly_button_indicator(&morning_only, &local(5, 17)), Indicator::Danger);

        let both = [belly(5, true, true)];
        assert_eq!(belly_button_indicator(&both, &local(5, 20)), Indicator::Success);

        let evening_only = [belly(5, false, true)];
        assert_eq!(belly_button_indicator(&evening_only, &local(5, 20)), Indicator::Danger);
        assert_eq!(belly_button_indicator(&[], &local(5, 8)), Indicator::Danger);
    }

    #[test]
    fn test_last_days_fill_missing_with_placeholders() {
        let days = belly_button_days(&[belly(4, true, true)], date(5), 3);
        assert_eq!(
            days.iter().map(|d| d.date).collect::<Vec<_>>(),
            vec![date(5), date(4), date(3)]
        );
        assert!(!days[0].morning && !days[0].evening);
        assert!(days[1].morning && days[1].evening);

        let vitamin = vitamin_d_days(&[], date(5), 7);
        assert_eq!(vitamin.len(), 7);
        assert!(vitamin.iter().all(|d| !d.taken));
    }
}
