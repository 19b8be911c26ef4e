use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    day_key, Collection, CreateBathRequest, CreateDiaperRequest, CreateFeedingRequest,
    CreateMedicationRequest, DiaperType, FeedingSide, UpdateBathRequest, UpdateBellyButtonRequest,
    UpdateDiaperRequest, UpdateFeedingRequest, UpdateMedicationRequest, UpdateSleepRequest,
    UpdateVitaminDRequest, UpsertBellyButtonRequest, UpsertSleepRequest, UpsertVitaminDRequest,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::change::{Change, TrackedRecord};
use super::pipeline::{MutationCommand, MutationError, OptimisticPipeline};
use crate::services::date_utils::to_wire;
use crate::services::{RecordApi, RecordWrite};
use crate::sync::snapshot::{
    BathEntry, BellyButtonEntry, DiaperEntry, FeedingEntry, MedicationEntry, SleepEntry,
    VitaminDEntry,
};
use crate::sync::DataSynchronizer;

/// Which of the two daily belly-button cleanings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningSlot {
    Morning,
    Evening,
}

/// Every caregiver action, each one an optimistic mutation
#[derive(Clone)]
pub struct CareActions {
    api: Arc<dyn RecordApi>,
    pipeline: OptimisticPipeline,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl CareActions {
    pub fn new(api: Arc<dyn RecordApi>, sync: Arc<DataSynchronizer>) -> Self {
        Self {
            api,
            pipeline: OptimisticPipeline::new(sync),
        }
    }

    fn synchronizer(&self) -> &Arc<DataSynchronizer> {
        self.pipeline.synchronizer()
    }

    fn local<T: TrackedRecord>(&self, key: &T::Key) -> Option<T> {
        T::find(&self.synchronizer().snapshot(), key)
    }

    fn require<T: TrackedRecord>(&self, key: &T::Key) -> Result<T, MutationError> {
        self.local(key).ok_or_else(|| MutationError::UnknownRecord {
            collection: T::COLLECTION,
            key: key.to_string(),
        })
    }

    async fn submit<T: TrackedRecord>(
        &self,
        change: Change<T>,
        write: RecordWrite,
    ) -> Result<(), MutationError> {
        self.pipeline
            .submit(MutationCommand::write(&self.api, change, write))
            .await
    }

    async fn insert<T: TrackedRecord>(
        &self,
        mut record: T,
        write: RecordWrite,
    ) -> Result<(), MutationError> {
        record.touch(Utc::now());
        self.submit(Change::Insert(record), write).await
    }

    async fn update<T: TrackedRecord>(
        &self,
        key: T::Key,
        edit: impl FnOnce(&mut T),
        write: impl FnOnce(&T) -> Result<RecordWrite, crate::services::ApiError>,
    ) -> Result<(), MutationError> {
        let previous = self.require::<T>(&key)?;
        let mut next = previous.clone();
        edit(&mut next);
        next.touch(Utc::now());
        let write = write(&next)?;
        self.submit(Change::Update { previous, next }, write).await
    }

    async fn remove<T: TrackedRecord>(&self, key: T::Key) -> Result<(), MutationError> {
        let previous = self.require::<T>(&key)?;
        let write = RecordWrite::delete(T::COLLECTION, key.to_string());
        self.submit(Change::Remove(previous), write).await
    }

    /// Upsert a day-keyed record: `PUT /X/{date}` when the day is known
    /// locally, `POST /X` otherwise. `blank` builds the record for a new day.
    async fn upsert_day<T>(
        &self,
        date: NaiveDate,
        blank: impl FnOnce() -> T,
        edit: impl FnOnce(&mut T),
        update_write: impl FnOnce(&T) -> Result<RecordWrite, crate::services::ApiError>,
        create_write: impl FnOnce(&T) -> Result<RecordWrite, crate::services::ApiError>,
    ) -> Result<(), MutationError>
    where
        T: TrackedRecord<Key = NaiveDate>,
    {
        match self.local::<T>(&date) {
            Some(_) => self.update(date, edit, update_write).await,
            None => {
                let mut record = blank();
                edit(&mut record);
                let write = create_write(&record)?;
                self.insert(record, write).await
            }
        }
    }

    // Medications

    /// Record a dose, returning its id
    pub async fn take_medication(
        &self,
        name: &str,
        taken_at: DateTime<Utc>,
    ) -> Result<String, MutationError> {
        info!("Recording {} dose", name);
        let id = new_id();
        let write = RecordWrite::create(
            Collection::Medications,
            &CreateMedicationRequest {
                id: Some(id.clone()),
                name: name.to_string(),
                timestamp: Some(to_wire(taken_at)),
            },
        )?;
        let entry = MedicationEntry {
            id: id.clone(),
            name: name.to_string(),
            taken_at,
            updated_at: None,
        };
        self.insert(entry, write).await?;
        Ok(id)
    }

    pub async fn retime_medication(
        &self,
        id: &str,
        taken_at: DateTime<Utc>,
    ) -> Result<(), MutationError> {
        self.update::<MedicationEntry>(
            id.to_string(),
            |dose| dose.taken_at = taken_at,
            |dose| {
                RecordWrite::update(
                    Collection::Medications,
                    &dose.id,
                    &UpdateMedicationRequest {
                        timestamp: to_wire(dose.taken_at),
                    },
                )
            },
        )
        .await
    }

    pub async fn delete_medication(&self, id: &str) -> Result<(), MutationError> {
        self.remove::<MedicationEntry>(id.to_string()).await
    }

    // Feedings

    pub async fn log_feeding(
        &self,
        taken_at: DateTime<Utc>,
        side: Option<FeedingSide>,
        note: Option<String>,
    ) -> Result<String, MutationError> {
        let id = new_id();
        let write = RecordWrite::create(
            Collection::Feedings,
            &CreateFeedingRequest {
                id: Some(id.clone()),
                timestamp: Some(to_wire(taken_at)),
                side,
                note: note.clone(),
            },
        )?;
        let entry = FeedingEntry {
            id: id.clone(),
            taken_at,
            side,
            note,
            updated_at: None,
        };
        self.insert(entry, write).await?;
        Ok(id)
    }

    pub async fn edit_feeding(
        &self,
        id: &str,
        taken_at: DateTime<Utc>,
        side: Option<FeedingSide>,
        note: Option<String>,
    ) -> Result<(), MutationError> {
        self.update::<FeedingEntry>(
            id.to_string(),
            |feeding| {
                feeding.taken_at = taken_at;
                feeding.side = side;
                feeding.note = note;
            },
            |feeding| {
                RecordWrite::update(
                    Collection::Feedings,
                    &feeding.id,
                    &UpdateFeedingRequest {
                        timestamp: to_wire(feeding.taken_at),
                        side: feeding.side,
                        note: feeding.note.clone(),
                    },
                )
            },
        )
        .await
    }

    pub async fn delete_feeding(&self, id: &str) -> Result<(), MutationError> {
        self.remove::<FeedingEntry>(id.to_string()).await
    }

    // Vitamin D

    pub async fn set_vitamin_d(&self, date: NaiveDate, taken: bool) -> Result<(), MutationError> {
        info!("Marking vitamin D for {} as {}", date, taken);
        self.upsert_day(
            date,
            || VitaminDEntry {
                date,
                taken: false,
                updated_at: None,
            },
            |record| record.taken = taken,
            |record| {
                RecordWrite::update(
                    Collection::VitaminD,
                    day_key(record.date),
                    &UpdateVitaminDRequest {
                        taken: record.taken,
                    },
                )
            },
            |record| {
                RecordWrite::create(
                    Collection::VitaminD,
                    &UpsertVitaminDRequest {
                        date: day_key(record.date),
                        taken: record.taken,
                    },
                )
            },
        )
        .await
    }

    pub async fn delete_vitamin_d(&self, date: NaiveDate) -> Result<(), MutationError> {
        self.remove::<VitaminDEntry>(date).await
    }

    // Baths

    pub async fn record_bath(&self, taken_at: DateTime<Utc>) -> Result<String, MutationError> {
        let id = new_id();
        let write = RecordWrite::create(
            Collection::Baths,
            &CreateBathRequest {
                id: Some(id.clone()),
                timestamp: Some(to_wire(taken_at)),
            },
        )?;
        let entry = BathEntry {
            id: id.clone(),
            taken_at,
            updated_at: None,
        };
        self.insert(entry, write).await?;
        Ok(id)
    }

    pub async fn retime_bath(&self, id: &str, taken_at: DateTime<Utc>) -> Result<(), MutationError> {
        self.update::<BathEntry>(
            id.to_string(),
            |bath| bath.taken_at = taken_at,
            |bath| {
                RecordWrite::update(
                    Collection::Baths,
                    &bath.id,
                    &UpdateBathRequest {
                        timestamp: to_wire(bath.taken_at),
                    },
                )
            },
        )
        .await
    }

    pub async fn delete_bath(&self, id: &str) -> Result<(), MutationError> {
        self.remove::<BathEntry>(id.to_string()).await
    }

    // Belly button

    /// Flip one cleaning of `date`, leaving the other as it is
    pub async fn toggle_belly_button(
        &self,
        date: NaiveDate,
        slot: CleaningSlot,
    ) -> Result<(), MutationError> {
        self.upsert_day(
            date,
            || BellyButtonEntry {
                date,
                morning: false,
                evening: false,
                updated_at: None,
            },
            |record| match slot {
                CleaningSlot::Morning => record.morning = !record.morning,
                CleaningSlot::Evening => record.evening = !record.evening,
            },
            |record| {
                RecordWrite::update(
                    Collection::BellyButton,
                    day_key(record.date),
                    &UpdateBellyButtonRequest {
                        morning: record.morning,
                        evening: record.evening,
                    },
                )
            },
            |record| {
                RecordWrite::create(
                    Collection::BellyButton,
                    &UpsertBellyButtonRequest {
                        date: day_key(record.date),
                        morning: record.morning,
                        evening: record.evening,
                    },
                )
            },
        )
        .await
    }

    pub async fn delete_belly_button(&self, date: NaiveDate) -> Result<(), MutationError> {
        self.remove::<BellyButtonEntry>(date).await
    }

    // Diapers

    pub async fn log_diaper(
        &self,
        taken_at: DateTime<Utc>,
        diaper_type: DiaperType,
    ) -> Result<String, MutationError> {
        let id = new_id();
        let write = RecordWrite::create(
            Collection::Diapers,
            &CreateDiaperRequest {
                id: Some(id.clone()),
                timestamp: Some(to_wire(taken_at)),
                diaper_type,
            },
        )?;
        let entry = DiaperEntry {
            id: id.clone(),
            taken_at,
            diaper_type,
            updated_at: None,
        };
        self.insert(entry, write).await?;
        Ok(id)
    }

    pub async fn edit_diaper(
        &self,
        id: &str,
        taken_at: DateTime<Utc>,
        diaper_type: DiaperType,
    ) -> Result<(), MutationError> {
        self.update::<DiaperEntry>(
            id.to_string(),
            |change| {
                change.taken_at = taken_at;
                change.diaper_type = diaper_type;
            },
            |change| {
                RecordWrite::update(
                    Collection::Diapers,
                    &change.id,
                    &UpdateDiaperRequest {
                        timestamp: to_wire(change.taken_at),
                        diaper_type: change.diaper_type,
                    },
                )
            },
        )
        .await
    }

    pub async fn delete_diaper(&self, id: &str) -> Result<(), MutationError> {
        self.remove::<DiaperEntry>(id.to_string()).await
    }

    // Sleep

    /// Set or clear when the night of `date` started
    pub async fn set_bed_time(
        &self,
        date: NaiveDate,
        bed_time: Option<DateTime<Utc>>,
    ) -> Result<(), MutationError> {
        self.edit_night(date, |night| night.bed_time = bed_time).await
    }

    pub async fn set_wake_time(
        &self,
        date: NaiveDate,
        wake_time: Option<DateTime<Utc>>,
    ) -> Result<(), MutationError> {
        self.edit_night(date, |night| night.wake_time = wake_time).await
    }

    pub async fn set_sleep_comment(
        &self,
        date: NaiveDate,
        comment: Option<String>,
    ) -> Result<(), MutationError> {
        let comment = comment.filter(|c| !c.trim().is_empty());
        self.edit_night(date, |night| night.comment = comment).await
    }

    pub async fn delete_sleep(&self, date: NaiveDate) -> Result<(), MutationError> {
        self.remove::<SleepEntry>(date).await
    }

    // The server replaces all three fields, so every write carries the whole night
    async fn edit_night(
        &self,
        date: NaiveDate,
        edit: impl FnOnce(&mut SleepEntry),
    ) -> Result<(), MutationError> {
        self.upsert_day(
            date,
            || SleepEntry {
                date,
                bed_time: None,
                wake_time: None,
                comment: None,
                updated_at: None,
            },
            edit,
            |night| {
                RecordWrite::update(
                    Collection::Sleep,
                    day_key(night.date),
                    &UpdateSleepRequest {
                        bed_time: night.bed_time.map(to_wire),
                        wake_time: night.wake_time.map(to_wire),
                        comment: night.comment.clone(),
                    },
                )
            },
            |night| {
                RecordWrite::create(
                    Collection::Sleep,
                    &UpsertSleepRequest {
                        date: day_key(night.date),
                        bed_time: night.bed_time.map(to_wire),
                        wake_time: night.wake_time.map(to_wire),
                        comment: night.comment.clone(),
                    },
                )
            },
        )
        .await
    }
}
