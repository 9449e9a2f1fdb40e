//! Mail transports
//!
//! `SmtpMailTransport` delivers through an SMTP relay with lettre.
//! `DisabledTransport` is used when no SMTP host is configured and fails
//! every send.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use crate::config::MailConfig;

/// Port on which SMTP servers expect implicit TLS
const SMTPS_PORT: u16 = 465;

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Something that can deliver an email
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Make a single delivery attempt
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// SMTP relay transport
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| anyhow!("Invalid from address '{}': {}", config.from, e))?;

        let mut builder = if config.smtp_port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .with_context(|| format!("Failed to create SMTP transport for {}", config.smtp_host))?
        .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| anyhow!("Invalid recipient address '{}': {}", email.to, e))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| anyhow!("Failed to build email: {}", e))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;
        Ok(())
    }
}

/// Transport used when SMTP is not configured
#[derive(Debug, Default)]
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        Err(anyhow!(
            "Mail delivery is disabled (no SMTP host configured); dropping message to {}",
            email.to
        ))
    }
}

/// Build the transport described by the configuration
pub fn create_transport(config: &MailConfig) -> Result<Arc<dyn MailTransport>> {
    if config.smtp_host.trim().is_empty() {
        tracing::warn!("SMTP host not configured, outgoing mail is disabled");
        return Ok(Arc::new(DisabledTransport));
    }
    tracing::info!("Using SMTP relay {}:{}", config.smtp_host, config.smtp_port);
    Ok(Arc::new(SmtpMailTransport::from_config(config)?))
}
