//! Queue consumer
//!
//! `QueueWorker` reserves jobs, dispatches them by name to registered
//! handlers and reschedules failures with the job's backoff until its
//! attempts are used up.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::{Job, JobQueue};

/// Processes jobs of one name
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: &Job) -> Result<()>;
}

/// Result of processing one reserved job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Nothing was ready
    Idle,
    Completed,
    /// The job failed and was rescheduled
    Retrying { attempt: u32, delay: Duration },
    /// The job failed for good and was dropped
    Failed,
}

pub struct QueueWorker {
    queue: Arc<dyn JobQueue>,
    handlers: HashMap<String, Arc<dyn JobHandler>>,
    concurrency: usize,
    poll_interval: Duration,
}

impl QueueWorker {
    pub fn new(queue: Arc<dyn JobQueue>, poll_interval: Duration) -> Self {
        Self {
            queue,
            handlers: HashMap::new(),
            concurrency: 1,
            poll_interval,
        }
    }

    /// Number of polling loops started by [`run`](Self::run)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Register the handler for jobs named `name`
    pub fn register(mut self, name: &str, handler: Arc<dyn JobHandler>) -> Self {
        self.handlers.insert(name.to_string(), handler);
        self
    }

    /// Reserve and process at most one job
    pub async fn process_next(&self) -> Result<JobOutcome> {
        let Some(mut job) = self.queue.reserve().await? else {
            return Ok(JobOutcome::Idle);
        };
        job.attempts_made += 1;

        let Some(handler) = self.handlers.get(&job.name) else {
            error!("No handler registered for job '{}' ({}), dropping it", job.name, job.id);
            return Ok(JobOutcome::Failed);
        };

        match handler.handle(&job).await {
            Ok(()) => {
                info!(
                    "Job {} ({}) completed on attempt {}",
                    job.id, job.name, job.attempts_made
                );
                Ok(JobOutcome::Completed)
            }
            Err(e) if job.can_retry() => {
                let attempt = job.attempts_made;
                let delay = job.options.backoff.delay_for(attempt);
                warn!(
                    "Job {} ({}) failed on attempt {}/{}: {:#}; retrying in {}ms",
                    job.id,
                    job.name,
                    attempt,
                    job.options.attempts,
                    e,
                    delay.as_millis()
                );
                self.queue.schedule_retry(job, delay).await?;
                Ok(JobOutcome::Retrying { attempt, delay })
            }
            Err(e) => {
                error!(
                    "Job {} ({}) failed after {} attempts: {:#}",
                    job.id, job.name, job.attempts_made, e
                );
                Ok(JobOutcome::Failed)
            }
        }
    }

    /// Run the polling loops until `shutdown` becomes `true`
    pub async fn run(self: Arc<Self>, shutdown: watch::Receiver<bool>) {
        info!("Queue worker started with {} loop(s)", self.concurrency);
        let mut loops = JoinSet::new();
        for _ in 0..self.concurrency {
            let worker = self.clone();
            let shutdown = shutdown.clone();
            loops.spawn(async move { worker.poll_loop(shutdown).await });
        }
        while let Some(result) = loops.join_next().await {
            if let Err(e) = result {
                error!("Queue worker loop panicked: {}", e);
            }
        }
        info!("Queue worker stopped");
    }

    async fn poll_loop(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            let wait = match self.process_next().await {
                Ok(JobOutcome::Idle) => true,
                Ok(outcome) => {
                    debug!("Job outcome: {:?}", outcome);
                    false
                }
                Err(e) => {
                    error!("Queue error: {:#}", e);
                    true
                }
            };

            if wait {
                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
}
