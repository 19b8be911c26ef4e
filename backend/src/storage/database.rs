use serde::{Deserialize, Serialize};

use crate::domain::models::{
    Account, Baby, Bath, BellyButtonDay, DiaperChange, FeedingSession, MedicationDose, SleepNight,
    VitaminDDay,
};

/// The persisted document.
///
/// Every collection defaults to empty when missing, which is how documents
/// written before a collection existed are migrated on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(default)]
    pub babies: Vec<Baby>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub medications: Vec<MedicationDose>,
    #[serde(default)]
    pub feedings: Vec<FeedingSession>,
    #[serde(default, rename = "vitaminD")]
    pub vitamin_d: Vec<VitaminDDay>,
    #[serde(default)]
    pub baths: Vec<Bath>,
    #[serde(default)]
    pub belly_button: Vec<BellyButtonDay>,
    #[serde(default)]
    pub diapers: Vec<DiaperChange>,
    #[serde(default)]
    pub sleep: Vec<SleepNight>,
}

impl Database {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
