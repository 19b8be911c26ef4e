use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::services::date_utils::format_hours_minutes;
use crate::sync::snapshot::MedicationEntry;

/// Minimum spacing between two doses of one drug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedicationRule {
    pub name: &'static str,
    pub hours_between_doses: i64,
}

pub const DEFAULT_RULES: &[MedicationRule] = &[
    MedicationRule {
        name: "Alvedon",
        hours_between_doses: 6,
    },
    MedicationRule {
        name: "Ipren",
        hours_between_doses: 4,
    },
];

pub fn rule_for<'a>(rules: &'a [MedicationRule], name: &str) -> Option<&'a MedicationRule> {
    rules.iter().find(|rule| rule.name == name)
}

pub fn latest_dose<'a>(doses: &'a [MedicationEntry], name: &str) -> Option<&'a MedicationEntry> {
    doses
        .iter()
        .filter(|dose| dose.name == name)
        .max_by_key(|dose| dose.taken_at)
}

/// Earliest instant the next dose of `name` may be taken.
///
/// `now` when the drug was never taken; `None` for a drug without a rule.
pub fn next_allowed_time(
    rules: &[MedicationRule],
    doses: &[MedicationEntry],
    name: &str,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let rule = rule_for(rules, name)?;
    Some(match latest_dose(doses, name) {
        Some(dose) => dose.taken_at + Duration::hours(rule.hours_between_doses),
        None => now,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Eligibility {
    pub next_allowed: DateTime<Utc>,
    pub eligible: bool,
    /// Whole minutes until the next dose, zero once eligible
    pub remaining: Duration,
}

pub fn eligibility(
    rules: &[MedicationRule],
    doses: &[MedicationEntry],
    name: &str,
    now: DateTime<Utc>,
) -> Option<Eligibility> {
    let next_allowed = next_allowed_time(rules, doses, name, now)?;
    let remaining = remaining_time(next_allowed, now);
    Some(Eligibility {
        next_allowed,
        eligible: now >= next_allowed,
        remaining,
    })
}

/// `next - now` floored to whole minutes, never negative
pub fn remaining_time(next: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let minutes = (next - now).num_seconds().max(0) / 60;
    Duration::minutes(minutes)
}

/// `Now`, or the time left as `2h 5m`
pub fn remaining_label(next: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if next <= now {
        "Now".to_string()
    } else {
        format_hours_minutes(remaining_time(next, now))
    }
}

/// Doses of the last 24 hours, newest first
pub fn recent_doses<'a>(
    doses: &'a [MedicationEntry],
    now: &DateTime<FixedOffset>,
) -> Vec<&'a MedicationEntry> {
    let since = now.with_timezone(&Utc) - Duration::hours(24);
    let mut recent: Vec<_> = doses.iter().filter(|dose| dose.taken_at >= since).collect();
    recent.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dose(id: &str, name: &str, taken_at: DateTime<Utc>) -> MedicationEntry {
        MedicationEntry {
            id: id.to_string(),
            name: name.to_string(),
            taken_at,
            updated_at: None,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_next_allowed_is_last_dose_plus_rule() {
        let doses = vec![
            dose("m1", "Alvedon", t0() - Duration::hours(3)),
            dose("m2", "Alvedon", t0()),
            dose("m3", "Ipren", t0()),
        ];
        assert_eq!(
            next_allowed_time(DEFAULT_RULES, &doses, "Alvedon", t0()),
            Some(t0() + Duration::hours(6))
        );
        assert_eq!(
            next_allowed_time(DEFAULT_RULES, &doses, "Ipren", t0()),
            Some(t0() + Duration::hours(4))
        );
    }

    #[test]
    fn test_not_eligible_before_interval_with_floored_remaining() {
        let doses = vec![dose("m1", "Alvedon", t0())];
        let now = t0() + Duration::hours(4) + Duration::seconds(30);

        let result = eligibility(DEFAULT_RULES, &doses, "Alvedon", now).unwrap();
        assert!(!result.eligible);
        // 1h 59m 30s left
        assert_eq!(result.remaining, Duration::minutes(119));
        assert_eq!(remaining_label(result.next_allowed, now), "1h 59m");
    }

    #[test]
    fn test_eligible_at_and_after_interval() {
        let doses = vec![dose("m1", "Ipren", t0())];
        for now in [t0() + Duration::hours(4), t0() + Duration::hours(9)] {
            let result = eligibility(DEFAULT_RULES, &doses, "Ipren", now).unwrap();
            assert!(result.eligible);
            assert_eq!(remaining_label(result.next_allowed, now), "Now");
        }
    }

    #[test]
    fn test_never_taken_is_eligible_now() {
        let result = eligibility(DEFAULT_RULES, &[], "Alvedon", t0()).unwrap();
        assert!(result.eligible);
        assert_eq!(result.next_allowed, t0());
    }

    #[test]
    fn test_unknown_drug_has_no_rule() {
        let doses = vec![dose("m1", "Aspirin", t0())];
        assert_eq!(next_allowed_time(DEFAULT_RULES, &doses, "Aspirin", t0()), None);
        assert_eq!(eligibility(DEFAULT_RULES, &doses, "Aspirin", t0()), None);
    }

    #[test]
    fn test_recent_doses_window_and_order() {
        let now = t0().fixed_offset();
        let doses = vec![
            dose("old", "Alvedon", t0() - Duration::hours(25)),
            dose("early", "Alvedon", t0() - Duration::hours(10)),
            dose("late", "Ipren", t0() - Duration::hours(1)),
        ];
        let ids: Vec<_> = recent_doses(&doses, &now).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["late", "early"]);
    }
}
