//! Typed, in-memory mirror of the per-baby status snapshot.
//!
//! Wire records carry instants and day keys as strings. Normalization parses
//! them once per fetch:
//! - an event whose taken-at cannot be parsed is dropped
//! - an unparseable optional instant (sleep endpoints, updated-at) becomes `None`
//! - a day-keyed record whose date cannot be parsed is dropped
//!
//! Every anomaly is logged; none fails the fetch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use shared::{DiaperType, FeedingSide, StatusSnapshot};
use tracing::warn;

use crate::services::date_utils::parse_wire;

#[derive(Debug, Clone, PartialEq)]
pub struct MedicationEntry {
    pub id: String,
    pub name: String,
    pub taken_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedingEntry {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub side: Option<FeedingSide>,
    pub note: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VitaminDEntry {
    pub date: NaiveDate,
    pub taken: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BathEntry {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BellyButtonEntry {
    pub date: NaiveDate,
    pub morning: bool,
    pub evening: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiaperEntry {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub diaper_type: DiaperType,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SleepEntry {
    pub date: NaiveDate,
    pub bed_time: Option<DateTime<Utc>>,
    pub wake_time: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// All collections of one baby at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedSnapshot {
    pub medications: Vec<MedicationEntry>,
    pub feedings: Vec<FeedingEntry>,
    pub vitamin_d: Vec<VitaminDEntry>,
    pub baths: Vec<BathEntry>,
    pub belly_button: Vec<BellyButtonEntry>,
    pub diapers: Vec<DiaperEntry>,
    pub sleep: Vec<SleepEntry>,
}

impl TrackedSnapshot {
    pub fn from_wire(wire: StatusSnapshot) -> Self {
        Self {
            medications: normalize(wire.medications),
            feedings: normalize(wire.feedings),
            vitamin_d: normalize(wire.vitamin_d),
            baths: normalize(wire.baths),
            belly_button: normalize(wire.belly_button),
            diapers: normalize(wire.diapers),
            sleep: normalize(wire.sleep),
        }
    }
}

/// A typed entry that can be built from its wire DTO
pub trait WireRecord: Sized {
    type Wire: DeserializeOwned + Send;

    /// `None` when a required field cannot be parsed
    fn from_wire(wire: Self::Wire) -> Option<Self>;
}

pub fn normalize<T: WireRecord>(wire: Vec<T::Wire>) -> Vec<T> {
    wire.into_iter().filter_map(T::from_wire).collect()
}

fn required_instant(kind: &str, id: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let Some(raw) = raw else {
        warn!("Dropping {} {}: no timestamp", kind, id);
        return None;
    };
    let parsed = parse_wire(raw);
    if parsed.is_none() {
        warn!("Dropping {} {}: unparseable timestamp {:?}", kind, id, raw);
    }
    parsed
}

fn optional_instant(kind: &str, field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = parse_wire(raw);
    if parsed.is_none() {
        warn!("Ignoring unparseable {} {} {:?}", kind, field, raw);
    }
    parsed
}

fn day(kind: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let Some(raw) = raw else {
        warn!("Dropping {} record: no date", kind);
        return None;
    };
    let parsed = shared::parse_day_key(raw);
    if parsed.is_none() {
        warn!("Dropping {} record: unparseable date {:?}", kind, raw);
    }
    parsed
}

impl WireRecord for MedicationEntry {
    type Wire = shared::Medication;

    fn from_wire(wire: Self::Wire) -> Option<Self> {
        Some(Self {
            taken_at: required_instant("medication", &wire.id, wire.timestamp.as_deref())?,
            updated_at: optional_instant("medication", "updatedAt", wire.updated_at.as_deref()),
            id: wire.id,
            name: wire.name,
        })
    }
}

impl WireRecord for FeedingEntry {
    type Wire = shared::FeedingSession;

    fn from_wire(wire: Self::Wire) -> Option<Self> {
        Some(Self {
            taken_at: required_instant("feeding", &wire.id, wire.timestamp.as_deref())?,
            updated_at: optional_instant("feeding", "updatedAt", wire.updated_at.as_deref()),
            id: wire.id,
            side: wire.side,
            note: wire.note,
        })
    }
}

impl WireRecord for VitaminDEntry {
    type Wire = shared::VitaminDRecord;

    fn from_wire(wire: Self::Wire) -> Option<Self> {
        Some(Self {
            date: day("vitamin D", wire.date.as_deref())?,
            taken: wire.taken,
            updated_at: optional_instant("vitamin D", "updatedAt", wire.updated_at.as_deref()),
        })
    }
}

impl WireRecord for BathEntry {
    type Wire = shared::BathRecord;

    fn from_wire(wire: Self::Wire) -> Option<Self> {
        Some(Self {
            taken_at: required_instant("bath", &wire.id, wire.timestamp.as_deref())?,
            updated_at: optional_instant("bath", "updatedAt", wire.updated_at.as_deref()),
            id: wire.id,
        })
    }
}

impl WireRecord for BellyButtonEntry {
    type Wire = shared::BellyButtonRecord;

    fn from_wire(wire: Self::Wire) -> Option<Self> {
        Some(Self {
            date: day("belly-button", wire.date.as_deref())?,
            morning: wire.morning,
            evening: wire.evening,
            updated_at: optional_instant("belly-button", "updatedAt", wire.updated_at.as_deref()),
        })
    }
}

impl WireRecord for DiaperEntry {
    type Wire = shared::DiaperChange;

    fn from_wire(wire: Self::Wire) -> Option<Self> {
        Some(Self {
            taken_at: required_instant("diaper", &wire.id, wire.timestamp.as_deref())?,
            updated_at: optional_instant("diaper", "updatedAt", wire.updated_at.as_deref()),
            id: wire.id,
            diaper_type: wire.diaper_type,
        })
    }
}

impl WireRecord for SleepEntry {
    type Wire = shared::SleepRecord;

    fn from_wire(wire: Self::Wire) -> Option<Self> {
        Some(Self {
            date: day("sleep", wire.date.as_deref())?,
            bed_time: optional_instant("sleep", "bedTime", wire.bed_time.as_deref()),
            wake_time: optional_instant("sleep", "wakeTime", wire.wake_time.as_deref()),
            updated_at: optional_instant("sleep", "updatedAt", wire.updated_at.as_deref()),
            comment: wire.comment,
        })
    }
}
