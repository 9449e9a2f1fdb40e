//! Config entry service

use std::sync::Arc;

use super::validation;
use super::{ServiceError, ServiceResult};
use crate::db::repositories::ConfigEntryRepository;
use crate::models::{ConfigEntry, CreateConfigEntryInput, UpdateConfigEntryInput};

pub const MAX_KEY_LEN: usize = 255;

pub struct ConfigEntryService {
    repo: Arc<dyn ConfigEntryRepository>,
}

impl ConfigEntryService {
    pub fn new(repo: Arc<dyn ConfigEntryRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateConfigEntryInput) -> ServiceResult<ConfigEntry> {
        let key = validation::required("key", &input.key, MAX_KEY_LEN)?;
        let value = validation::required_unbounded("value", &input.value)?;
        self.ensure_key_free(&key).await?;

        let entry = ConfigEntry::new(key, value);
        self.repo
            .create(&entry)
            .await
            .map_err(|e| ServiceError::from_write(e, || key_taken(&entry.key)))
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<ConfigEntry>> {
        Ok(self.repo.list().await?)
    }

    pub async fn find_one(&self, id: i64) -> ServiceResult<ConfigEntry> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Config entry", id))
    }

    pub async fn find_by_key(&self, key: &str) -> ServiceResult<ConfigEntry> {
        self.repo
            .get_by_key(key)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Config entry '{}' not found", key)))
    }

    pub async fn update(&self, id: i64, input: UpdateConfigEntryInput) -> ServiceResult<ConfigEntry> {
        let mut entry = self.find_one(id).await?;

        if let Some(key) = input.key {
            let key = validation::required("key", &key, MAX_KEY_LEN)?;
            if key != entry.key {
                self.ensure_key_free(&key).await?;
            }
            entry.key = key;
        }
        if let Some(value) = input.value {
            entry.value = validation::required_unbounded("value", &value)?;
        }

        self.repo
            .update(&entry)
            .await
            .map_err(|e| ServiceError::from_write(e, || key_taken(&entry.key)))
    }

    pub async fn remove(&self, id: i64) -> ServiceResult<ConfigEntry> {
        let entry = self.find_one(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Config entry", id));
        }
        Ok(entry)
    }

    async fn ensure_key_free(&self, key: &str) -> ServiceResult<()> {
        if self.repo.get_by_key(key).await?.is_some() {
            return Err(ServiceError::Conflict(key_taken(key)));
        }
        Ok(())
    }
}

fn key_taken(key: &str) -> String {
    format!("Config entry '{}' already exists", key)
}
