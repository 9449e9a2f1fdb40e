//! Config entry repository
//!
//! Repository for runtime key/value configuration stored in the `config` table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::ConfigEntry;

const SELECT_COLUMNS: &str = "SELECT id, `key`, value, created_at, updated_at FROM config";

/// Repository trait for config entry operations
#[async_trait]
pub trait ConfigEntryRepository: Send + Sync {
    async fn create(&self, entry: &ConfigEntry) -> Result<ConfigEntry>;

    async fn get_by_id(&self, id: i64) -> Result<Option<ConfigEntry>>;

    /// Get a single entry by key
    async fn get_by_key(&self, key: &str) -> Result<Option<ConfigEntry>>;

    /// Get all entries, ordered by key
    async fn list(&self) -> Result<Vec<ConfigEntry>>;

    async fn update(&self, entry: &ConfigEntry) -> Result<ConfigEntry>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based config entry repository
pub struct SqlxConfigEntryRepository {
    pool: DynDatabasePool,
}

impl SqlxConfigEntryRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ConfigEntryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ConfigEntryRepository for SqlxConfigEntryRepository {
    async fn create(&self, entry: &ConfigEntry) -> Result<ConfigEntry> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.sqlite()?, entry).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.mysql()?, entry).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ConfigEntry>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn get_by_key(&self, key: &str) -> Result<Option<ConfigEntry>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_key_sqlite(self.pool.sqlite()?, key).await,
            DatabaseDriver::Mysql => get_by_key_mysql(self.pool.mysql()?, key).await,
        }
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.mysql()?).await,
        }
    }

    async fn update(&self, entry: &ConfigEntry) -> Result<ConfigEntry> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.sqlite()?, entry).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.mysql()?, entry).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.mysql()?, id).await,
        }
    }
}

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, entry: &ConfigEntry) -> Result<ConfigEntry> {
    let now = Utc::now();
    let result = sqlx::query("INSERT INTO config (`key`, value, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create config entry")?;

    Ok(ConfigEntry {
        id: result.last_insert_rowid(),
        key: entry.key.clone(),
        value: entry.value.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<ConfigEntry>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get config entry")?;
    Ok(row.map(|r| row_to_entry_sqlite(&r)))
}

async fn get_by_key_sqlite(pool: &SqlitePool, key: &str) -> Result<Option<ConfigEntry>> {
    let row = sqlx::query(&format!("{} WHERE `key` = ?", SELECT_COLUMNS))
        .bind(key)
        .fetch_optional(pool)
        .await
        .context("Failed to get config entry by key")?;
    Ok(row.map(|r| row_to_entry_sqlite(&r)))
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<ConfigEntry>> {
    let rows = sqlx::query(&format!("{} ORDER BY `key`", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list config entries")?;
    Ok(rows.iter().map(row_to_entry_sqlite).collect())
}

async fn update_sqlite(pool: &SqlitePool, entry: &ConfigEntry) -> Result<ConfigEntry> {
    sqlx::query("UPDATE config SET `key` = ?, value = ?, updated_at = ? WHERE id = ?")
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(Utc::now())
        .bind(entry.id)
        .execute(pool)
        .await
        .context("Failed to update config entry")?;
    get_by_id_sqlite(pool, entry.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Config entry not found after update"))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM config WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete config entry")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_entry_sqlite(row: &sqlx::sqlite::SqliteRow) -> ConfigEntry {
    ConfigEntry {
        id: row.get("id"),
        key: row.get("key"),
        value: row.get("value"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// MySQL implementations

async fn create_mysql(pool: &MySqlPool, entry: &ConfigEntry) -> Result<ConfigEntry> {
    let now = Utc::now();
    let result = sqlx::query("INSERT INTO config (`key`, value, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create config entry")?;

    Ok(ConfigEntry {
        id: result.last_insert_id() as i64,
        key: entry.key.clone(),
        value: entry.value.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<ConfigEntry>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get config entry")?;
    Ok(row.map(|r| row_to_entry_mysql(&r)))
}

async fn get_by_key_mysql(pool: &MySqlPool, key: &str) -> Result<Option<ConfigEntry>> {
    let row = sqlx::query(&format!("{} WHERE `key` = ?", SELECT_COLUMNS))
        .bind(key)
        .fetch_optional(pool)
        .await
        .context("Failed to get config entry by key")?;
    Ok(row.map(|r| row_to_entry_mysql(&r)))
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<ConfigEntry>> {
    let rows = sqlx::query(&format!("{} ORDER BY `key`", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list config entries")?;
    Ok(rows.iter().map(row_to_entry_mysql).collect())
}

async fn update_mysql(pool: &MySqlPool, entry: &ConfigEntry) -> Result<ConfigEntry> {
    sqlx::query("UPDATE config SET `key` = ?, value = ?, updated_at = ? WHERE id = ?")
        .bind(&entry.key)
        .bind(&entry.value)
        .bind(Utc::now())
        .bind(entry.id)
        .execute(pool)
        .await
        .context("Failed to update config entry")?;
    get_by_id_mysql(pool, entry.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Config entry not found after update"))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM config WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete config entry")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_entry_mysql(row: &sqlx::mysql::MySqlRow) -> ConfigEntry {
    ConfigEntry {
        id: row.get("id"),
        key: row.get("key"),
        value: row.get("value"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
