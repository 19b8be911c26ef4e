use chrono::{DateTime, FixedOffset, Utc};

use super::care::{
    bath_indicator, belly_button_indicator, latest_bath, vitamin_d_indicator, Indicator,
};
use super::diaper::{day_stats, diaper_indicator, latest_change, DayStats, DIAPER_STATS_DAYS};
use super::feeding::{feeding_urgency, latest_feeding, next_feeding_estimate, FeedingUrgency};
use super::medication::{eligibility, latest_dose, remaining_label, MedicationRule};
use super::sleep::{night_views, NightView};
use crate::sync::TrackedSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct MedicationStatus {
    pub name: &'static str,
    pub last_dose: Option<DateTime<Utc>>,
    pub next_allowed: DateTime<Utc>,
    pub eligible: bool,
    pub remaining: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBoard {
    pub medications: Vec<MedicationStatus>,
    pub last_feeding: Option<DateTime<Utc>>,
    pub next_feeding: Option<DateTime<Utc>>,
    pub feeding: FeedingUrgency,
    pub vitamin_d: Indicator,
    pub last_bath: Option<DateTime<Utc>>,
    pub bath: Indicator,
    pub belly_button: Indicator,
    pub last_diaper: Option<DateTime<Utc>>,
    pub diaper: Indicator,
    pub diaper_days: Vec<DayStats>,
    pub nights: Vec<NightView>,
}

impl StatusBoard {
    /// Every indicator for `snapshot` as seen at the caregiver's local `now`
    pub fn compute(
        snapshot: &TrackedSnapshot,
        rules: &[MedicationRule],
        now: &DateTime<FixedOffset>,
    ) -> Self {
        let utc_now = now.with_timezone(&Utc);

        let medications = rules
            .iter()
            .filter_map(|rule| {
                let status = eligibility(rules, &snapshot.medications, rule.name, utc_now)?;
                Some(MedicationStatus {
                    name: rule.name,
                    last_dose: latest_dose(&snapshot.medications, rule.name).map(|d| d.taken_at),
                    remaining: remaining_label(status.next_allowed, utc_now),
                    next_allowed: status.next_allowed,
                    eligible: status.eligible,
                })
            })
            .collect();

        Self {
            medications,
            last_feeding: latest_feeding(&snapshot.feedings).map(|f| f.taken_at),
            next_feeding: next_feeding_estimate(&snapshot.feedings),
            feeding: feeding_urgency(&snapshot.feedings, utc_now),
            vitamin_d: vitamin_d_indicator(&snapshot.vitamin_d, now),
            last_bath: latest_bath(&snapshot.baths),
            bath: bath_indicator(&snapshot.baths, utc_now),
            belly_button: belly_button_indicator(&snapshot.belly_button, now),
            last_diaper: latest_change(&snapshot.diapers),
            diaper: diaper_indicator(&snapshot.diapers, utc_now),
            diaper_days: day_stats(&snapshot.diapers, now, DIAPER_STATS_DAYS),
            nights: night_views(&snapshot.sleep, now.date_naive(), false),
        }
    }
}
