use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::domain::daily_record_service::DailyRecordService;
use crate::domain::event_log_service::EventLogService;
use crate::domain::models::{
    Bath, BellyButtonDay, DiaperChange, FeedingSession, MedicationDose, SleepNight, VitaminDDay,
};

/// Diapers older than this are left out of the status snapshot
pub const DIAPER_WINDOW_DAYS: i64 = 3;
/// Sleep nights older than this are left out of the status snapshot
pub const SLEEP_WINDOW_DAYS: i64 = 7;

/// Everything the client needs for one refresh, for one baby
#[derive(Debug, Clone, Default)]
pub struct BabyStatus {
    pub medications: Vec<MedicationDose>,
    pub feedings: Vec<FeedingSession>,
    pub vitamin_d: Vec<VitaminDDay>,
    pub baths: Vec<Bath>,
    pub belly_button: Vec<BellyButtonDay>,
    pub diapers: Vec<DiaperChange>,
    pub sleep: Vec<SleepNight>,
}

/// Assembles the per-baby snapshot served by `GET /api/status`
#[derive(Clone)]
pub struct StatusService {
    medications: EventLogService<MedicationDose>,
    feedings: EventLogService<FeedingSession>,
    baths: EventLogService<Bath>,
    diapers: EventLogService<DiaperChange>,
    vitamin_d: DailyRecordService<VitaminDDay>,
    belly_button: DailyRecordService<BellyButtonDay>,
    sleep: DailyRecordService<SleepNight>,
}

impl StatusService {
    pub fn new(
        medications: EventLogService<MedicationDose>,
        feedings: EventLogService<FeedingSession>,
        baths: EventLogService<Bath>,
        diapers: EventLogService<DiaperChange>,
        vitamin_d: DailyRecordService<VitaminDDay>,
        belly_button: DailyRecordService<BellyButtonDay>,
        sleep: DailyRecordService<SleepNight>,
    ) -> Self {
        Self {
            medications,
            feedings,
            baths,
            diapers,
            vitamin_d,
            belly_button,
            sleep,
        }
    }

    pub async fn snapshot(&self, baby_id: &str, now: DateTime<Utc>) -> BabyStatus {
        let diapers_since = now - Duration::days(DIAPER_WINDOW_DAYS);
        let sleep_since = now.date_naive() - Duration::days(SLEEP_WINDOW_DAYS);

        let status = BabyStatus {
            medications: self.medications.list(baby_id, None).await,
            feedings: self.feedings.list(baby_id, None).await,
            vitamin_d: self.vitamin_d.list(baby_id, None).await,
            baths: self.baths.list(baby_id, None).await,
            belly_button: self.belly_button.list(baby_id, None).await,
            diapers: self.diapers.list(baby_id, Some(diapers_since)).await,
            sleep: self.sleep.list(baby_id, Some(sleep_since)).await,
        };

        info!(
            "Status for baby {}: {} medications, {} feedings, {} diapers, {} nights",
            baby_id,
            status.medications.len(),
            status.feedings.len(),
            status.diapers.len(),
            status.sleep.len()
        );
        status
    }
}
