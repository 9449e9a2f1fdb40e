//! Queued job representation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::backoff::Backoff;
use crate::config::QueueConfig;

/// Retry options attached to a job when it is enqueued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    /// Total attempts, including the first
    pub attempts: u32,
    pub backoff: Backoff,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Backoff::exponential(1000),
        }
    }
}

impl From<&QueueConfig> for JobOptions {
    fn from(config: &QueueConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            backoff: Backoff {
                strategy: config.backoff,
                delay_ms: config.backoff_delay_ms,
            },
        }
    }
}

/// A named unit of background work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    /// Handler name, e.g. `send-email`
    pub name: String,
    pub payload: Value,
    pub options: JobOptions,
    /// Attempts already started
    #[serde(default)]
    pub attempts_made: u32,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(name: impl Into<String>, payload: Value, options: JobOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            payload,
            options,
            attempts_made: 0,
            created_at: Utc::now(),
        }
    }

    /// Whether another attempt is allowed after the current one fails
    pub fn can_retry(&self) -> bool {
        self.attempts_made < self.options.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackoffStrategy;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = JobOptions::default();
        assert_eq!(options.attempts, 3);
        assert_eq!(options.backoff.strategy, BackoffStrategy::Exponential);
        assert_eq!(options.backoff.delay_ms, 1000);
    }

    #[test]
    fn test_options_from_config_clamps_attempts() {
        let config = QueueConfig {
            attempts: 0,
            ..Default::default()
        };
        assert_eq!(JobOptions::from(&config).attempts, 1);
    }

    #[test]
    fn test_can_retry() {
        let mut job = Job::new("send-email", json!({}), JobOptions::default());
        job.attempts_made = 2;
        assert!(job.can_retry());
        job.attempts_made = 3;
        assert!(!job.can_retry());
    }

    #[test]
    fn test_job_json_shape() {
        let job = Job::new("send-email", json!({"to": "a@example.com"}), JobOptions::default());
        let value = serde_json::to_value(&job).unwrap();

        assert_eq!(value["name"], "send-email");
        assert_eq!(value["options"]["attempts"], 3);
        assert_eq!(value["options"]["backoff"]["type"], "exponential");
        assert_eq!(value["attempts_made"], 0);
    }
}
