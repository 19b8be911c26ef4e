use chrono::{NaiveDate, Utc};
use std::marker::PhantomData;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DailyRecord;
use crate::storage::{JsonConnection, StoredCollection};

/// CRUD over a day-keyed collection (vitamin D, belly-button, sleep).
///
/// A baby has at most one record per calendar day; `upsert` replaces the
/// existing one, `update` refuses to create.
pub struct DailyRecordService<R> {
    connection: JsonConnection,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for DailyRecordService<R> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> DailyRecordService<R>
where
    R: DailyRecord + StoredCollection,
{
    pub fn new(connection: JsonConnection) -> Self {
        Self {
            connection,
            _record: PhantomData,
        }
    }

    /// All records of the baby, optionally only days on or after `since`
    pub async fn list(&self, baby_id: &str, since: Option<NaiveDate>) -> Vec<R> {
        self.connection
            .read(|db| {
                R::records(db)
                    .iter()
                    .filter(|r| r.baby_id() == baby_id)
                    .filter(|r| since.map_or(true, |since| r.date() >= since))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Insert the record, replacing the baby's record for the same day if present
    pub async fn upsert(&self, mut record: R) -> DomainResult<R> {
        info!("Upserting {} {} for baby {}", R::LABEL, record.date(), record.baby_id());

        record.touch(Utc::now());
        self.connection
            .write(|db| -> DomainResult<R> {
                let records = R::records_mut(db);
                match records
                    .iter_mut()
                    .find(|r| r.date() == record.date() && r.baby_id() == record.baby_id())
                {
                    Some(existing) => *existing = record.clone(),
                    None => records.push(record.clone()),
                }
                Ok(record)
            })
            .await
    }

    /// Apply `edit` to the baby's record for `date`. Absent days are not created.
    pub async fn update(
        &self,
        baby_id: &str,
        date: NaiveDate,
        edit: impl FnOnce(&mut R),
    ) -> DomainResult<R> {
        info!("Updating {} {} for baby {}", R::LABEL, date, baby_id);

        self.connection
            .write(|db| -> DomainResult<R> {
                let record = R::records_mut(db)
                    .iter_mut()
                    .find(|r| r.date() == date && r.baby_id() == baby_id)
                    .ok_or_else(|| DomainError::not_found(R::LABEL))?;
                edit(record);
                record.touch(Utc::now());
                Ok(record.clone())
            })
            .await
    }

    /// Remove the baby's record for `date`. Returns whether a record was removed.
    pub async fn delete(&self, baby_id: &str, date: NaiveDate) -> DomainResult<bool> {
        info!("Deleting {} {} for baby {}", R::LABEL, date, baby_id);

        let exists = self
            .connection
            .read(|db| {
                R::records(db)
                    .iter()
                    .any(|r| r.date() == date && r.baby_id() == baby_id)
            })
            .await;
        if !exists {
            return Ok(false);
        }

        self.connection
            .write(|db| -> DomainResult<bool> {
                let records = R::records_mut(db);
                let before = records.len();
                records.retain(|r| !(r.date() == date && r.baby_id() == baby_id));
                Ok(records.len() < before)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{SleepNight, VitaminDDay};
    use chrono::{DateTime, TimeZone};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn vitamin_d(baby_id: &str, date: NaiveDate, taken: bool) -> VitaminDDay {
        VitaminDDay {
            baby_id: baby_id.to_string(),
            date,
            taken,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_record_per_day() {
        let (conn, _dir) = JsonConnection::open_temp().await.unwrap();
        let service = DailyRecordService::<VitaminDDay>::new(conn);

        service.upsert(vitamin_d("b1", day(1), false)).await.unwrap();
        service.upsert(vitamin_d("b1", day(1), true)).await.unwrap();
        service.upsert(vitamin_d("b2", day(1), false)).await.unwrap();

        let records = service.list("b1", None).await;
        assert_eq!(records.len(), 1);
        assert!(records[0].taken);
        assert_eq!(service.list("b2", None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_absent_day_is_not_found() {
        let (conn, _dir) = JsonConnection::open_temp().await.unwrap();
        let service = DailyRecordService::<VitaminDDay>::new(conn);

        let err = service
            .update("b1", day(2), |r| r.taken = true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(service.list("b1", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_sleep_endpoints_update_independently() {
        let (conn, _dir) = JsonConnection::open_temp().await.unwrap();
        let service = DailyRecordService::<SleepNight>::new(conn);
        let bed = Utc.with_ymd_and_hms(2024, 3, 1, 19, 30, 0).unwrap();
        let wake = Utc.with_ymd_and_hms(2024, 3, 2, 6, 15, 0).unwrap();

        service
            .upsert(SleepNight {
                baby_id: "b1".to_string(),
                date: day(1),
                bed_time: Some(bed),
                wake_time: None,
                comment: None,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        let updated = service
            .update("b1", day(1), |r| r.wake_time = Some(wake))
            .await
            .unwrap();

        assert_eq!(updated.bed_time, Some(bed));
        assert_eq!(updated.wake_time, Some(wake));
    }

    #[tokio::test]
    async fn test_list_since_and_delete() {
        let (conn, _dir) = JsonConnection::open_temp().await.unwrap();
        let service = DailyRecordService::<VitaminDDay>::new(conn);
        for d in 1..=5 {
            service.upsert(vitamin_d("b1", day(d), true)).await.unwrap();
        }

        assert_eq!(service.list("b1", Some(day(4))).await.len(), 2);
        assert!(service.delete("b1", day(4)).await.unwrap());
        assert!(!service.delete("b1", day(4)).await.unwrap());
        assert!(!service.delete("b2", day(5)).await.unwrap());
        assert_eq!(service.list("b1", Some(day(4))).await.len(), 1);
    }
}
