//! Data models
//!
//! This module contains the data structures used throughout Folio:
//! - Database entities (Contact, Page, Post, Content, ConfigEntry)
//! - API request types (create/update inputs)

mod config_entry;
mod contact;
mod content;
mod page;
mod post;

use serde::{Deserialize, Serialize};

pub use config_entry::{ConfigEntry, CreateConfigEntryInput, UpdateConfigEntryInput};
pub use contact::{Contact, CreateContactInput, UpdateContactInput};
pub use content::{Content, ContentType, CreateContentInput, UpdateContentInput};
pub use page::{CreatePageInput, Page, UpdatePageInput};
pub use post::{CreatePostInput, Post, UpdatePostInput};

/// Publication status shared by pages and posts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for PublishStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(anyhow::anyhow!("Invalid publish status: {}", s)),
        }
    }
}
