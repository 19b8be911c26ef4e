use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::sync::snapshot::FeedingEntry;

/// Expected time between feedings
pub const FEEDING_INTERVAL_HOURS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedingUrgency {
    /// The estimated next feeding has passed
    Past,
    /// Due within the hour
    Soon,
    Future,
}

pub fn latest_feeding(feedings: &[FeedingEntry]) -> Option<&FeedingEntry> {
    feedings.iter().max_by_key(|feeding| feeding.taken_at)
}

pub fn next_feeding_estimate(feedings: &[FeedingEntry]) -> Option<DateTime<Utc>> {
    latest_feeding(feedings).map(|f| f.taken_at + Duration::hours(FEEDING_INTERVAL_HOURS))
}

pub fn feeding_urgency(feedings: &[FeedingEntry], now: DateTime<Utc>) -> FeedingUrgency {
    let Some(estimate) = next_feeding_estimate(feedings) else {
        return FeedingUrgency::Past;
    };
    let until = estimate - now;
    if until < Duration::zero() {
        FeedingUrgency::Past
    } else if until < Duration::hours(1) {
        FeedingUrgency::Soon
    } else {
        FeedingUrgency::Future
    }
}

/// Feedings of the last 24 hours, newest first
pub fn recent_feedings<'a>(
    feedings: &'a [FeedingEntry],
    now: &DateTime<FixedOffset>,
) -> Vec<&'a FeedingEntry> {
    let since = now.with_timezone(&Utc) - Duration::hours(24);
    let mut recent: Vec<_> = feedings.iter().filter(|f| f.taken_at >= since).collect();
    recent.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
    recent
}
