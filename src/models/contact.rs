//! Contact form submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored contact form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(name: String, email: String, phone: Option<String>, message: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            email,
            phone,
            message,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for a contact form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContactInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Client-side reCAPTCHA token, checked when verification is required
    #[serde(default)]
    pub recaptcha_token: Option<String>,
}

/// Input for updating a contact
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}
