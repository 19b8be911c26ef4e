//! Display helpers for instants, days and durations.
//!
//! Everything takes the caller's local "now" (an instant with its UTC
//! offset) so that calendar days and clock times are the caregiver's.

use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, SecondsFormat, Utc};

/// Calendar day of `instant` in the offset of `now`
pub fn local_date(instant: DateTime<Utc>, now: &DateTime<FixedOffset>) -> NaiveDate {
    instant.with_timezone(now.offset()).date_naive()
}

/// `Today 08:15`, `Yesterday 22:40`, otherwise `Mar 5 08:15`
pub fn format_relative_timestamp(instant: DateTime<Utc>, now: &DateTime<FixedOffset>) -> String {
    let local = instant.with_timezone(now.offset());
    let today = now.date_naive();
    let clock = local.format("%H:%M");

    if local.date_naive() == today {
        format!("Today {}", clock)
    } else if Some(local.date_naive()) == today.pred_opt() {
        format!("Yesterday {}", clock)
    } else {
        format!("{} {}", local.format("%b %-d"), clock)
    }
}

/// `Today`, `Yesterday`, otherwise `Monday, Mar 4`
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if Some(date) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        long_day(date)
    }
}

/// Nights are named by the day they started: `Tonight`, `Last Night`, otherwise `Monday, Mar 4`
pub fn night_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Tonight".to_string()
    } else if Some(date) == today.pred_opt() {
        "Last Night".to_string()
    } else {
        long_day(date)
    }
}

fn long_day(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}

/// Whole hours and minutes, `8h 10m`. Negative durations clamp to `0h 0m`.
pub fn format_hours_minutes(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// `today` and the `count - 1` days before it, newest first
pub fn trailing_days(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count as u64)
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Wire form of an instant
pub fn to_wire(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a wire instant; anything unparseable is `None`
pub fn parse_wire(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
