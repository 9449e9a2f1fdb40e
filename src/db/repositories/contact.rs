//! Contact repository
//!
//! Database operations for contact form submissions.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Contact;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_COLUMNS: &str =
    "SELECT id, name, email, phone, message, created_at, updated_at FROM contacts";

/// Contact repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert a new contact, returning it with its assigned ID
    async fn create(&self, contact: &Contact) -> Result<Contact>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Contact>>;

    /// List all contacts, newest first
    async fn list(&self) -> Result<Vec<Contact>>;

    /// Overwrite every mutable field of an existing contact
    async fn update(&self, contact: &Contact) -> Result<Contact>;

    /// Delete a contact, returning whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based contact repository for SQLite and MySQL
pub struct SqlxContactRepository {
    pool: DynDatabasePool,
}

impl SqlxContactRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, contact: &Contact) -> Result<Contact> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.sqlite()?, contact).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.mysql()?, contact).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Contact>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.mysql()?).await,
        }
    }

    async fn update(&self, contact: &Contact) -> Result<Contact> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.sqlite()?, contact).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.mysql()?, contact).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.mysql()?, id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_sqlite(pool: &SqlitePool, contact: &Contact) -> Result<Contact> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO contacts (name, email, phone, message, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.message)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create contact")?;

    Ok(Contact {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..contact.clone()
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Contact>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get contact")?;
    row.map(|r| row_to_contact_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Contact>> {
    let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list contacts")?;
    rows.iter().map(row_to_contact_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, contact: &Contact) -> Result<Contact> {
    let now = Utc::now();
    sqlx::query(
        "UPDATE contacts SET name = ?, email = ?, phone = ?, message = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.message)
    .bind(now)
    .bind(contact.id)
    .execute(pool)
    .await
    .context("Failed to update contact")?;
    get_by_id_sqlite(pool, contact.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Contact not found after update"))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete contact")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_contact_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Contact> {
    Ok(Contact {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        message: row.get("message"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, contact: &Contact) -> Result<Contact> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO contacts (name, email, phone, message, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.message)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create contact")?;

    Ok(Contact {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..contact.clone()
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Contact>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get contact")?;
    row.map(|r| row_to_contact_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Contact>> {
    let rows = sqlx::query(&format!("{} ORDER BY id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list contacts")?;
    rows.iter().map(row_to_contact_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, contact: &Contact) -> Result<Contact> {
    let now = Utc::now();
    sqlx::query(
        "UPDATE contacts SET name = ?, email = ?, phone = ?, message = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.message)
    .bind(now)
    .bind(contact.id)
    .execute(pool)
    .await
    .context("Failed to update contact")?;
    get_by_id_mysql(pool, contact.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Contact not found after update"))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete contact")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_contact_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Contact> {
    Ok(Contact {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        message: row.get("message"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
