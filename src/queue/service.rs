//! Producer side of the queue and the email job

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::{Job, JobHandler, JobOptions, JobQueue};
use crate::mail::EmailService;

/// Job name for queued email sends
pub const SEND_EMAIL_JOB: &str = "send-email";

/// Payload of a `send-email` job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub template: String,
    #[serde(default = "empty_context")]
    pub context: Value,
}

fn empty_context() -> Value {
    Value::Object(Default::default())
}

/// Adds jobs to the queue with the configured retry options
pub struct QueueService {
    queue: Arc<dyn JobQueue>,
    options: JobOptions,
}

impl QueueService {
    pub fn new(queue: Arc<dyn JobQueue>, options: JobOptions) -> Self {
        Self { queue, options }
    }

    pub fn queue(&self) -> Arc<dyn JobQueue> {
        self.queue.clone()
    }

    /// Enqueue an arbitrary named job with the default options
    pub async fn add(&self, name: &str, payload: Value) -> Result<Uuid> {
        let job = Job::new(name, payload, self.options);
        let id = job.id;
        self.queue.enqueue(job).await?;
        tracing::debug!("Queued job {} ({})", id, name);
        Ok(id)
    }

    /// Enqueue a `send-email` job
    pub async fn add_email_to_queue(&self, email: EmailJob) -> Result<Uuid> {
        let payload = serde_json::to_value(&email).context("Failed to serialize email job")?;
        self.add(SEND_EMAIL_JOB, payload).await
    }
}

/// Worker-side handler that delivers queued emails
pub struct EmailJobHandler {
    email: Arc<EmailService>,
}

impl EmailJobHandler {
    pub fn new(email: Arc<EmailService>) -> Self {
        Self { email }
    }
}

#[async_trait]
impl JobHandler for EmailJobHandler {
    async fn handle(&self, job: &Job) -> Result<()> {
        let email: EmailJob =
            serde_json::from_value(job.payload.clone()).context("Invalid send-email payload")?;
        self.email
            .deliver(&email.to, &email.subject, &email.template, &email.context)
            .await
    }
}
