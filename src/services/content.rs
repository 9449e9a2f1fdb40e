//! Content service
//!
//! Keys are unique, and every value must be well-formed for the entry's
//! type (see [`ContentType::accepts`]).

use std::sync::Arc;

use super::validation;
use super::{ServiceError, ServiceResult};
use crate::db::repositories::ContentRepository;
use crate::models::{Content, ContentType, CreateContentInput, UpdateContentInput};

pub const MAX_KEY_LEN: usize = 255;

pub struct ContentService {
    repo: Arc<dyn ContentRepository>,
}

impl ContentService {
    pub fn new(repo: Arc<dyn ContentRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateContentInput) -> ServiceResult<Content> {
        let key = validation::required("key", &input.key, MAX_KEY_LEN)?;
        let content_type = input.content_type.unwrap_or_default();
        let value = checked_value(&input.value, content_type)?;

        if self.repo.get_by_key(&key).await?.is_some() {
            return Err(ServiceError::Conflict(key_taken(&key)));
        }

        let content = Content::new(key, value, content_type);
        self.repo
            .create(&content)
            .await
            .map_err(|e| ServiceError::from_write(e, || key_taken(&content.key)))
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Content>> {
        Ok(self.repo.list().await?)
    }

    pub async fn find_one(&self, id: i64) -> ServiceResult<Content> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Content", id))
    }

    pub async fn find_by_key(&self, key: &str) -> ServiceResult<Content> {
        self.repo
            .get_by_key(key)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Content with key '{}' not found", key)))
    }

    pub async fn update(&self, id: i64, input: UpdateContentInput) -> ServiceResult<Content> {
        let mut content = self.find_one(id).await?;

        if let Some(key) = input.key {
            let key = validation::required("key", &key, MAX_KEY_LEN)?;
            if key != content.key && self.repo.get_by_key(&key).await?.is_some() {
                return Err(ServiceError::Conflict(key_taken(&key)));
            }
            content.key = key;
        }
        if let Some(content_type) = input.content_type {
            content.content_type = content_type;
        }
        if let Some(value) = input.value {
            content.value = value;
        }
        // Re-check even when only the type changed.
        content.value = checked_value(&content.value, content.content_type)?;

        self.repo
            .update(&content)
            .await
            .map_err(|e| ServiceError::from_write(e, || key_taken(&content.key)))
    }

    pub async fn remove(&self, id: i64) -> ServiceResult<Content> {
        let content = self.find_one(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Content", id));
        }
        Ok(content)
    }
}

fn key_taken(key: &str) -> String {
    format!("Content with key '{}' already exists", key)
}

fn checked_value(value: &str, content_type: ContentType) -> ServiceResult<String> {
    let value = validation::required_unbounded("value", value)?;
    if !content_type.accepts(&value) {
        return Err(ServiceError::validation(format!(
            "value is not a valid {} value",
            content_type
        )));
    }
    Ok(value)
}
