//! Redis job queue
//!
//! Jobs are stored as JSON strings under two keys per queue:
//! - `{prefix}:{name}:wait`: list of ready jobs (LPUSH in, RPOP out)
//! - `{prefix}:{name}:delayed`: sorted set of retries scored by the Unix
//!   time in milliseconds at which they become ready
//!
//! Several worker processes can share one queue. Promotion of a delayed job
//! only pushes it onto the wait list when this process won the ZREM, so a
//! job is never promoted twice.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;

use super::{Job, JobQueue};

/// Redis queue backend
pub struct RedisQueue {
    connection: MultiplexedConnection,
    wait_key: String,
    delayed_key: String,
}

impl std::fmt::Debug for RedisQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisQueue")
            .field("wait_key", &self.wait_key)
            .field("delayed_key", &self.delayed_key)
            .finish_non_exhaustive()
    }
}

impl RedisQueue {
    /// Connect to Redis and address the queue `{prefix}:{name}`
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn new(redis_url: &str, prefix: &str, name: &str) -> Result<Self> {
        let client = Client::open(redis_url).context("Failed to create Redis client")?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")?;

        Ok(Self {
            connection,
            wait_key: format!("{}:{}:wait", prefix, name),
            delayed_key: format!("{}:{}:delayed", prefix, name),
        })
    }

    /// Move every delayed job whose time has come onto the wait list
    async fn promote_due(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let now = Utc::now().timestamp_millis();

        let due: Vec<String> = conn
            .zrangebyscore(&self.delayed_key, "-inf", now)
            .await
            .context("Failed to read delayed jobs from Redis")?;

        for raw in due {
            let removed: i64 = conn
                .zrem(&self.delayed_key, &raw)
                .await
                .context("Failed to remove delayed job from Redis")?;
            if removed == 1 {
                let _: () = conn
                    .lpush(&self.wait_key, &raw)
                    .await
                    .context("Failed to promote delayed job in Redis")?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn enqueue(&self, job: Job) -> Result<()> {
        let raw = serde_json::to_string(&job).context("Failed to serialize job")?;
        let mut conn = self.connection.clone();
        let _: () = conn
            .lpush(&self.wait_key, raw)
            .await
            .context("Failed to push job to Redis")?;
        Ok(())
    }

    async fn reserve(&self) -> Result<Option<Job>> {
        self.promote_due().await?;

        let mut conn = self.connection.clone();
        let raw: Option<String> = conn
            .rpop(&self.wait_key, None)
            .await
            .context("Failed to pop job from Redis")?;

        match raw {
            Some(raw) => {
                let job = serde_json::from_str(&raw).context("Failed to deserialize job")?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    async fn schedule_retry(&self, job: Job, delay: Duration) -> Result<()> {
        let raw = serde_json::to_string(&job).context("Failed to serialize job")?;
        let ready_at = Utc::now().timestamp_millis() + delay.as_millis() as i64;
        let mut conn = self.connection.clone();
        let _: () = conn
            .zadd(&self.delayed_key, raw, ready_at)
            .await
            .context("Failed to schedule job retry in Redis")?;
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let mut conn = self.connection.clone();
        let waiting: usize = conn
            .llen(&self.wait_key)
            .await
            .context("Failed to read queue length from Redis")?;
        let delayed: usize = conn
            .zcard(&self.delayed_key)
            .await
            .context("Failed to read delayed count from Redis")?;
        Ok(waiting + delayed)
    }
}
