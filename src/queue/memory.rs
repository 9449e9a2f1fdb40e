//! In-process job queue
//!
//! Keeps ready jobs in a FIFO and delayed retries in a list of
//! `(ready_at, job)` pairs. Suitable for a single instance and for tests;
//! jobs are lost on restart.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{Job, JobQueue};

#[derive(Debug, Default)]
struct Inner {
    ready: VecDeque<Job>,
    delayed: Vec<(Instant, Job)>,
}

/// In-memory queue backend
#[derive(Debug, Default)]
pub struct MemoryQueue {
    inner: Mutex<Inner>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, job: Job) -> Result<()> {
        self.inner.lock().await.ready.push_back(job);
        Ok(())
    }

    async fn reserve(&self) -> Result<Option<Job>> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        let mut due = Vec::new();
        inner.delayed.retain(|(ready_at, job)| {
            if *ready_at <= now {
                due.push((*ready_at, job.clone()));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(ready_at, _)| *ready_at);
        inner.ready.extend(due.into_iter().map(|(_, job)| job));

        Ok(inner.ready.pop_front())
    }

    async fn schedule_retry(&self, job: Job, delay: Duration) -> Result<()> {
        let ready_at = Instant::now() + delay;
        self.inner.lock().await.delayed.push((ready_at, job));
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        let inner = self.inner.lock().await;
        Ok(inner.ready.len() + inner.delayed.len())
    }
}
