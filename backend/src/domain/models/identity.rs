use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baby {
    pub id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Caregiver login. Owns exactly one baby.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub baby_id: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn matches_username(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username.trim())
    }
}
