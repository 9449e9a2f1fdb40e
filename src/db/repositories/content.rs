//! Content repository
//!
//! Database operations for typed key/value content entries. The `key`
//! column is quoted with backticks, which both SQLite and MySQL accept.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Content;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_COLUMNS: &str =
    "SELECT id, `key`, value, type, created_at, updated_at FROM content";

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create(&self, content: &Content) -> Result<Content>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Content>>;
    async fn get_by_key(&self, key: &str) -> Result<Option<Content>>;
    /// List all entries ordered by key
    async fn list(&self) -> Result<Vec<Content>>;
    async fn update(&self, content: &Content) -> Result<Content>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxContentRepository {
    pool: DynDatabasePool,
}

impl SqlxContentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContentRepository for SqlxContentRepository {
    async fn create(&self, content: &Content) -> Result<Content> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.sqlite()?, content).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.mysql()?, content).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Content>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn get_by_key(&self, key: &str) -> Result<Option<Content>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_key_sqlite(self.pool.sqlite()?, key).await,
            DatabaseDriver::Mysql => get_by_key_mysql(self.pool.mysql()?, key).await,
        }
    }

    async fn list(&self) -> Result<Vec<Content>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.mysql()?).await,
        }
    }

    async fn update(&self, content: &Content) -> Result<Content> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.sqlite()?, content).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.mysql()?, content).await,
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
async fn create_sqlite(pool: &SqlitePool, content: &Content) -> Result<Content> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO content (`key`, value, type, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&content.key)
    .bind(&content.value)
    .bind(content.content_type.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create content")?;

    Ok(Content {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..content.clone()
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get content")?;
    row.map(|r| row_to_content_sqlite(&r)).transpose()
}

async fn get_by_key_sqlite(pool: &SqlitePool, key: &str) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("{} WHERE `key` = ?", SELECT_COLUMNS))
        .bind(key)
        .fetch_optional(pool)
        .await
        .context("Failed to get content by key")?;
    row.map(|r| row_to_content_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Content>> {
    let rows = sqlx::query(&format!("{} ORDER BY `key`", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list content")?;
    rows.iter().map(row_to_content_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, content: &Content) -> Result<Content> {
    let now = Utc::now();
    sqlx::query("UPDATE content SET `key` = ?, value = ?, type = ?, updated_at = ? WHERE id = ?")
        .bind(&content.key)
        .bind(&content.value)
        .bind(content.content_type.to_string())
        .bind(now)
        .bind(content.id)
        .execute(pool)
        .await
        .context("Failed to update content")?;
    get_by_id_sqlite(pool, content.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Content not found after update"))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM content WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete content")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_content_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Content> {
    let type_str: String = row.get("type");
    Ok(Content {
        id: row.get("id"),
        key: row.get("key"),
        value: row.get("value"),
        content_type: type_str.parse().unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, content: &Content) -> Result<Content> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO content (`key`, value, type, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&content.key)
    .bind(&content.value)
    .bind(content.content_type.to_string())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create content")?;

    Ok(Content {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..content.clone()
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get content")?;
    row.map(|r| row_to_content_mysql(&r)).transpose()
}

async fn get_by_key_mysql(pool: &MySqlPool, key: &str) -> Result<Option<Content>> {
    let row = sqlx::query(&format!("{} WHERE `key` = ?", SELECT_COLUMNS))
        .bind(key)
        .fetch_optional(pool)
        .await
        .context("Failed to get content by key")?;
    row.map(|r| row_to_content_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Content>> {
    let rows = sqlx::query(&format!("{} ORDER BY `key`", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list content")?;
    rows.iter().map(row_to_content_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, content: &Content) -> Result<Content> {
    let now = Utc::now();
    sqlx::query("UPDATE content SET `key` = ?, value = ?, type = ?, updated_at = ? WHERE id = ?")
        .bind(&content.key)
        .bind(&content.value)
        .bind(content.content_type.to_string())
        .bind(now)
        .bind(content.id)
        .execute(pool)
        .await
        .context("Failed to update content")?;
    get_by_id_mysql(pool, content.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Content not found after update"))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM content WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete content")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_content_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Content> {
    let type_str: String = row.get("type");
    Ok(Content {
        id: row.get("id"),
        key: row.get("key"),
        value: row.get("value"),
        content_type: type_str.parse().unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
