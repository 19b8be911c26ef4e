use chrono::{DateTime, NaiveDate, Utc};
use shared::Collection;
use std::fmt;

use crate::sync::snapshot::{
    BathEntry, BellyButtonEntry, DiaperEntry, FeedingEntry, MedicationEntry, SleepEntry,
    TrackedSnapshot, VitaminDEntry,
};

/// A snapshot entry that can be changed locally, addressed by its key
pub trait TrackedRecord: Clone + Send + Sync + 'static {
    type Key: Clone + PartialEq + fmt::Display + Send;

    const COLLECTION: Collection;

    fn key(&self) -> Self::Key;
    fn records(snapshot: &TrackedSnapshot) -> &Vec<Self>;
    fn records_mut(snapshot: &mut TrackedSnapshot) -> &mut Vec<Self>;
    fn touch(&mut self, now: DateTime<Utc>);

    fn find(snapshot: &TrackedSnapshot, key: &Self::Key) -> Option<Self> {
        Self::records(snapshot)
            .iter()
            .find(|record| &record.key() == key)
            .cloned()
    }
}

macro_rules! tracked_record {
    ($record:ty, $key:ty, $collection:expr, $field:ident, |$this:ident| $key_expr:expr) => {
        impl TrackedRecord for $record {
            type Key = $key;

            const COLLECTION: Collection = $collection;

            fn key(&self) -> Self::Key {
                let $this = self;
                $key_expr
            }

            fn records(snapshot: &TrackedSnapshot) -> &Vec<Self> {
                &snapshot.$field
            }

            fn records_mut(snapshot: &mut TrackedSnapshot) -> &mut Vec<Self> {
                &mut snapshot.$field
            }

            fn touch(&mut self, now: DateTime<Utc>) {
                self.updated_at = Some(now);
            }
        }
    };
}

tracked_record!(MedicationEntry, String, Collection::Medications, medications, |r| r.id.clone());
tracked_record!(FeedingEntry, String, Collection::Feedings, feedings, |r| r.id.clone());
tracked_record!(BathEntry, String, Collection::Baths, baths, |r| r.id.clone());
tracked_record!(DiaperEntry, String, Collection::Diapers, diapers, |r| r.id.clone());
tracked_record!(VitaminDEntry, NaiveDate, Collection::VitaminD, vitamin_d, |r| r.date);
tracked_record!(BellyButtonEntry, NaiveDate, Collection::BellyButton, belly_button, |r| r.date);
tracked_record!(SleepEntry, NaiveDate, Collection::Sleep, sleep, |r| r.date);

/// One local change to a collection, reversible with [`Change::inverse`]
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Insert(T),
    Update { previous: T, next: T },
    Remove(T),
}

impl<T: TrackedRecord> Change<T> {
    pub fn key(&self) -> T::Key {
        match self {
            Change::Insert(record) | Change::Remove(record) => record.key(),
            Change::Update { next, .. } => next.key(),
        }
    }

    /// Apply by key: inserts and updates replace any record with the same key.
    ///
    /// Applying by key keeps an inverse correct even when a fetch replaced
    /// the snapshot since the forward change.
    pub fn apply(&self, snapshot: &mut TrackedSnapshot) {
        let records = T::records_mut(snapshot);
        match self {
            Change::Insert(record) | Change::Update { next: record, .. } => {
                let key = record.key();
                match records.iter_mut().find(|r| r.key() == key) {
                    Some(existing) => *existing = record.clone(),
                    None => records.push(record.clone()),
                }
            }
            Change::Remove(record) => {
                let key = record.key();
                records.retain(|r| r.key() != key);
            }
        }
    }

    pub fn inverse(self) -> Change<T> {
        match self {
            Change::Insert(record) => Change::Remove(record),
            Change::Update { previous, next } => Change::Update {
                previous: next,
                next: previous,
            },
            Change::Remove(record) => Change::Insert(record),
        }
    }
}
