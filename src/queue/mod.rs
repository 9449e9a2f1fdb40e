//! Background job queue
//!
//! Jobs are named payloads with retry options. Producers add them through
//! [`QueueService`]; a [`QueueWorker`] consumes them and dispatches to
//! registered [`JobHandler`]s. Two backends implement [`JobQueue`]:
//! - In-memory (default) for a single instance
//! - Redis (feature `redis-queue`) for jobs shared between instances
//!
//! # Usage
//!
//! ```rust,ignore
//! use folio::queue::{create_queue, EmailJob, QueueService, JobOptions};
//!
//! let queue = create_queue(&config.queue).await?;
//! let service = QueueService::new(queue, JobOptions::from(&config.queue));
//! service.add_email_to_queue(job).await?;
//! ```

pub mod job;
pub mod memory;
#[cfg(feature = "redis-queue")]
pub mod redis;
pub mod service;
pub mod worker;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{QueueConfig, QueueDriver};

pub use job::{Job, JobOptions};
pub use memory::MemoryQueue;
#[cfg(feature = "redis-queue")]
pub use self::redis::RedisQueue;
pub use service::{EmailJob, EmailJobHandler, QueueService, SEND_EMAIL_JOB};
pub use worker::{JobHandler, JobOutcome, QueueWorker};

/// Storage backend for jobs
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Append a job to the ready list
    async fn enqueue(&self, job: Job) -> Result<()>;

    /// Pop the next ready job, promoting delayed jobs that are due first
    async fn reserve(&self) -> Result<Option<Job>>;

    /// Hold a job back for `delay` before it becomes ready again
    async fn schedule_retry(&self, job: Job, delay: Duration) -> Result<()>;

    /// Ready plus delayed jobs
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Create the queue backend selected by configuration
pub async fn create_queue(config: &QueueConfig) -> Result<Arc<dyn JobQueue>> {
    match config.driver {
        QueueDriver::Memory => Ok(Arc::new(MemoryQueue::new())),
        QueueDriver::Redis => {
            #[cfg(feature = "redis-queue")]
            {
                let queue = RedisQueue::new(&config.redis_url(), &config.prefix, &config.name).await?;
                tracing::info!("Using Redis queue at {}", config.redis_url());
                Ok(Arc::new(queue))
            }

            #[cfg(not(feature = "redis-queue"))]
            {
                anyhow::bail!(
                    "Redis queue driver is configured but the 'redis-queue' feature is not enabled. \
                     Either enable the feature with `--features redis-queue` or use the 'memory' queue driver."
                )
            }
        }
    }
}
