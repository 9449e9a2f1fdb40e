//! Services layer - Business logic
//!
//! One service per entity. Services validate input, enforce uniqueness of
//! slugs and keys, and translate repository failures into [`ServiceError`].
//! The contact service also drives reCAPTCHA checks and queues owner
//! notifications.

pub mod config_entry;
pub mod contact;
pub mod content;
pub mod error;
pub mod page;
pub mod post;
pub mod slug;
pub mod validation;

pub use config_entry::ConfigEntryService;
pub use contact::{ContactNotifier, ContactService};
pub use content::ContentService;
pub use error::{ServiceError, ServiceResult};
pub use page::PageService;
pub use post::PostService;
pub use slug::generate_slug;
