//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod config_entry;
pub mod contact;
pub mod content;
pub mod page;
pub mod post;

pub use config_entry::{ConfigEntryRepository, SqlxConfigEntryRepository};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use content::{ContentRepository, SqlxContentRepository};
pub use page::{PageRepository, SqlxPageRepository};
pub use post::{PostRepository, SqlxPostRepository};
