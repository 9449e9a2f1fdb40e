//! Post repository
//!
//! Database operations for blog posts.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Post;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_COLUMNS: &str = "SELECT id, title, slug, content, excerpt, status, featured_image, created_at, updated_at FROM posts";

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> Result<Post>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;
    /// List all posts, newest first
    async fn list(&self) -> Result<Vec<Post>>;
    async fn update(&self, post: &Post) -> Result<Post>;
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;
}

pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.sqlite()?, post).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.mysql()?, post).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_slug_sqlite(self.pool.sqlite()?, slug).await,
            DatabaseDriver::Mysql => get_by_slug_mysql(self.pool.mysql()?, slug).await,
        }
    }

    async fn list(&self) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.mysql()?).await,
        }
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.sqlite()?, post).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.mysql()?, post).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => exists_by_slug_sqlite(self.pool.sqlite()?, slug).await,
            DatabaseDriver::Mysql => exists_by_slug_mysql(self.pool.mysql()?, slug).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_sqlite(pool: &SqlitePool, post: &Post) -> Result<Post> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, slug, content, excerpt, status, featured_image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(post.status.to_string())
    .bind(&post.featured_image)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..post.clone()
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;
    row.map(|r| row_to_post_sqlite(&r)).transpose()
}

async fn get_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("{} WHERE slug = ?", SELECT_COLUMNS))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by slug")?;
    row.map(|r| row_to_post_sqlite(&r)).transpose()
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list posts")?;
    rows.iter().map(row_to_post_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, post: &Post) -> Result<Post> {
    let now = Utc::now();
    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, slug = ?, content = ?, excerpt = ?, status = ?, featured_image = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(post.status.to_string())
    .bind(&post.featured_image)
    .bind(now)
    .bind(post.id)
    .execute(pool)
    .await
    .context("Failed to update post")?;
    get_by_id_sqlite(pool, post.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Post not found after update"))
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;
    Ok(result.rows_affected() > 0)
}

async fn exists_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to check post slug")?;
    Ok(row.get::<i64, _>("count") > 0)
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    let status_str: String = row.get("status");
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        excerpt: row.get("excerpt"),
        status: status_str.parse().unwrap_or_default(),
        featured_image: row.get("featured_image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, post: &Post) -> Result<Post> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, slug, content, excerpt, status, featured_image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(post.status.to_string())
    .bind(&post.featured_image)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    Ok(Post {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..post.clone()
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by ID")?;
    row.map(|r| row_to_post_mysql(&r)).transpose()
}

async fn get_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("{} WHERE slug = ?", SELECT_COLUMNS))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to get post by slug")?;
    row.map(|r| row_to_post_mysql(&r)).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list posts")?;
    rows.iter().map(row_to_post_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, post: &Post) -> Result<Post> {
    let now = Utc::now();
    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, slug = ?, content = ?, excerpt = ?, status = ?, featured_image = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&post.title)
    .bind(&post.slug)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(post.status.to_string())
    .bind(&post.featured_image)
    .bind(now)
    .bind(post.id)
    .execute(pool)
    .await
    .context("Failed to update post")?;
    get_by_id_mysql(pool, post.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Post not found after update"))
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;
    Ok(result.rows_affected() > 0)
}

async fn exists_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to check post slug")?;
    Ok(row.get::<i64, _>("count") > 0)
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Post> {
    let status_str: String = row.get("status");
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        excerpt: row.get("excerpt"),
        status: status_str.parse().unwrap_or_default(),
        featured_image: row.get("featured_image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
