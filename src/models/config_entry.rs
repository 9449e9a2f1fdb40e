//! Runtime configuration entries stored in the database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A key/value configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigEntry {
    pub fn new(key: String, value: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            key,
            value,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConfigEntryInput {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConfigEntryInput {
    pub key: Option<String>,
    pub value: Option<String>,
}
