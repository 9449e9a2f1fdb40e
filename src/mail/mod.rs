//! Email delivery
//!
//! `EmailService` renders a named template and hands the result to a
//! [`MailTransport`]. Direct sends retry failed deliveries up to
//! `max_retries` times, waiting according to the configured [`Backoff`]
//! between attempts. The queue worker uses [`EmailService::deliver`]
//! instead, a single attempt, and leaves retries to the queue.
//!
//! # Usage
//!
//! ```ignore
//! use folio::mail::EmailService;
//!
//! let email = EmailService::from_config(&config.mail)?;
//! let sent = email
//!     .send_contact_email("owner@example.com", "New contact", &context)
//!     .await;
//! ```

pub mod template;
pub mod transport;

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::backoff::Backoff;
use crate::config::MailConfig;

pub use template::{MailTemplates, CONTACT_TEMPLATE};
pub use transport::{
    create_transport, DisabledTransport, MailTransport, OutgoingEmail, SmtpMailTransport,
};

/// How many times a failed delivery is retried, and how long to wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Backoff::fixed(1000),
        }
    }
}

impl From<&MailConfig> for RetryPolicy {
    fn from(config: &MailConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: Backoff {
                strategy: config.backoff,
                delay_ms: config.retry_delay_ms,
            },
        }
    }
}

/// Template-based email sender with bounded retries
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    templates: MailTemplates,
    policy: RetryPolicy,
}

impl EmailService {
    pub fn new(transport: Arc<dyn MailTransport>, templates: MailTemplates, policy: RetryPolicy) -> Self {
        Self {
            transport,
            templates,
            policy,
        }
    }

    /// Build the service from mail configuration, choosing the transport
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        Ok(Self::new(
            create_transport(config)?,
            MailTemplates::new()?,
            RetryPolicy::from(config),
        ))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Render a template into a message for `to`
    pub fn render(&self, to: &str, subject: &str, template: &str, context: &Value) -> Result<OutgoingEmail> {
        Ok(OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: self.templates.render(template, context)?,
        })
    }

    /// Render and make exactly one delivery attempt
    pub async fn deliver(&self, to: &str, subject: &str, template: &str, context: &Value) -> Result<()> {
        let email = self.render(to, subject, template, context)?;
        self.transport.send(&email).await?;
        info!("Email sent successfully to {}", to);
        Ok(())
    }

    /// Render and deliver, retrying failed attempts.
    ///
    /// Rendering errors are returned immediately. After the last failed
    /// attempt the transport's error is returned.
    pub async fn try_send_with_retry(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        context: &Value,
    ) -> Result<()> {
        let email = self.render(to, subject, template, context)?;
        let mut attempt: u32 = 1;

        loop {
            match self.transport.send(&email).await {
                Ok(()) => {
                    info!("Email sent successfully to {} (attempt {})", to, attempt);
                    return Ok(());
                }
                Err(e) => {
                    error!("Failed to send email to {} (attempt {}): {:#}", to, attempt, e);

                    if attempt > self.policy.max_retries {
                        error!("Failed to send email to {} after {} attempts", to, attempt);
                        return Err(e);
                    }

                    let delay = self.policy.backoff.delay_for(attempt);
                    warn!(
                        "Retrying email to {} in {}ms (attempt {}/{})",
                        to,
                        delay.as_millis(),
                        attempt + 1,
                        self.policy.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Like [`try_send_with_retry`](Self::try_send_with_retry), reporting only success
    pub async fn send_with_retry(&self, to: &str, subject: &str, template: &str, context: &Value) -> bool {
        self.try_send_with_retry(to, subject, template, context)
            .await
            .is_ok()
    }

    /// Send using the built-in contact template
    pub async fn send_contact_email(&self, to: &str, subject: &str, context: &Value) -> bool {
        self.send_with_retry(to, subject, CONTACT_TEMPLATE, context).await
    }
}
