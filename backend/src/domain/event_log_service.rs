use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EventRecord;
use crate::storage::{JsonConnection, StoredCollection};

/// CRUD over one append-only event collection (medications, feedings, baths,
/// diapers), always scoped to a single baby.
///
/// Records of other babies are invisible: updating or deleting one behaves
/// exactly like updating or deleting an id that does not exist.
pub struct EventLogService<R> {
    connection: JsonConnection,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for EventLogService<R> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> EventLogService<R>
where
    R: EventRecord + StoredCollection,
{
    pub fn new(connection: JsonConnection) -> Self {
        Self {
            connection,
            _record: PhantomData,
        }
    }

    /// All records of the baby, optionally only those that happened at or after `since`
    pub async fn list(&self, baby_id: &str, since: Option<DateTime<Utc>>) -> Vec<R> {
        self.connection
            .read(|db| {
                R::records(db)
                    .iter()
                    .filter(|r| r.baby_id() == baby_id)
                    .filter(|r| since.map_or(true, |since| r.occurred_at() >= since))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Append a record. Reusing an id of the same baby is a conflict; an id
    /// held by another baby is silently replaced with a fresh one.
    pub async fn create(&self, mut record: R) -> DomainResult<R> {
        info!("Creating {} {} for baby {}", R::LABEL, record.id(), record.baby_id());

        record.touch(Utc::now());
        let stored = self
            .connection
            .write(|db| {
                let records = R::records_mut(db);
                let holder_is_same_baby = records
                    .iter()
                    .find(|r| r.id() == record.id())
                    .map(|r| r.baby_id() == record.baby_id());
                match holder_is_same_baby {
                    Some(true) => {
                        warn!("{} id {} already in use", R::LABEL, record.id());
                        return Err(DomainError::Conflict(format!(
                            "{} with id {} already exists",
                            R::LABEL,
                            record.id()
                        )));
                    }
                    Some(false) => {
                        let fresh = Uuid::new_v4().to_string();
                        warn!("{} id {} is taken, issuing {}", R::LABEL, record.id(), fresh);
                        record.set_id(fresh);
                    }
                    None => {}
                }
                records.push(record.clone());
                Ok(record)
            })
            .await?;

        info!("Created {} {}", R::LABEL, stored.id());
        Ok(stored)
    }

    /// Apply `edit` to the baby's record with `id` and stamp it
    pub async fn update(
        &self,
        baby_id: &str,
        id: &str,
        edit: impl FnOnce(&mut R),
    ) -> DomainResult<R> {
        info!("Updating {} {} for baby {}", R::LABEL, id, baby_id);

        self.connection
            .write(|db| -> DomainResult<R> {
                let record = R::records_mut(db)
                    .iter_mut()
                    .find(|r| r.id() == id && r.baby_id() == baby_id)
                    .ok_or_else(|| DomainError::not_found(R::LABEL))?;
                edit(record);
                record.touch(Utc::now());
                Ok(record.clone())
            })
            .await
    }

    /// Remove the baby's record with `id`. Returns whether a record was removed.
    pub async fn delete(&self, baby_id: &str, id: &str) -> DomainResult<bool> {
        info!("Deleting {} {} for baby {}", R::LABEL, id, baby_id);

        let exists = self
            .connection
            .read(|db| {
                R::records(db)
                    .iter()
                    .any(|r| r.id() == id && r.baby_id() == baby_id)
            })
            .await;
        if !exists {
            info!("{} {} already absent", R::LABEL, id);
            return Ok(false);
        }

        self.connection
            .write(|db| {
                let records = R::records_mut(db);
                let before = records.len();
                records.retain(|r| !(r.id() == id && r.baby_id() == baby_id));
                Ok::<_, DomainError>(records.len() < before)
            })
            .await
    }
}
