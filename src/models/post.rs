//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PublishStatus;

/// Blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub status: PublishStatus,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(title: String, slug: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            slug,
            content,
            excerpt: None,
            status: PublishStatus::Draft,
            featured_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub status: Option<PublishStatus>,
    #[serde(default)]
    pub featured_image: Option<String>,
}

/// Input for updating a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PublishStatus>,
    pub featured_image: Option<String>,
}
