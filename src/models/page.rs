//! Page model for standalone site pages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PublishStatus;

/// Site page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn new(title: String, slug: String, content: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            slug,
            content,
            status: PublishStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePageInput {
    pub title: String,
    /// Generated from the title when omitted
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<PublishStatus>,
}

/// Input for updating a page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePageInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub status: Option<PublishStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_new_defaults_to_draft() {
        let page = Page::new("About".to_string(), "about".to_string(), None);

        assert_eq!(page.id, 0);
        assert_eq!(page.status, PublishStatus::Draft);
        assert_eq!(page.created_at, page.updated_at);
    }

    #[test]
    fn test_create_input_rejects_unknown_status() {
        let result: Result<CreatePageInput, _> =
            serde_json::from_str(r#"{"title": "About", "status": "deleted"}"#);
        assert!(result.is_err());
    }
}
