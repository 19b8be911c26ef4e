use super::Database;
use crate::domain::models::{
    Bath, BellyButtonDay, DiaperChange, FeedingSession, MedicationDose, SleepNight, VitaminDDay,
};

/// Maps a record type to its array inside the [`Database`] document
pub trait StoredCollection: Sized {
    /// Human readable name used in log lines and errors
    const LABEL: &'static str;

    fn records(db: &Database) -> &Vec<Self>;
    fn records_mut(db: &mut Database) -> &mut Vec<Self>;
}

macro_rules! stored_collection {
    ($record:ty, $field:ident, $label:literal) => {
        impl StoredCollection for $record {
            const LABEL: &'static str = $label;

            fn records(db: &Database) -> &Vec<Self> {
                &db.$field
            }

            fn records_mut(db: &mut Database) -> &mut Vec<Self> {
                &mut db.$field
            }
        }
    };
}

stored_collection!(MedicationDose, medications, "Medication");
stored_collection!(FeedingSession, feedings, "Feeding session");
stored_collection!(Bath, baths, "Bath record");
stored_collection!(DiaperChange, diapers, "Diaper change");
stored_collection!(VitaminDDay, vitamin_d, "Vitamin D record");
stored_collection!(BellyButtonDay, belly_button, "Belly button record");
stored_collection!(SleepNight, sleep, "Sleep record");
