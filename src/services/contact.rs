//! Contact service
//!
//! Stores contact form submissions. A new submission is optionally checked
//! against reCAPTCHA first, and once saved a notification email is queued
//! for the site owner when a contact address is configured.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::validation;
use super::{ServiceError, ServiceResult};
use crate::db::repositories::ContactRepository;
use crate::mail::CONTACT_TEMPLATE;
use crate::models::{Contact, CreateContactInput, UpdateContactInput};
use crate::queue::{EmailJob, QueueService};
use crate::recaptcha::RecaptchaService;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_MESSAGE_LEN: usize = 500;

/// Where new-contact notifications go
pub struct ContactNotifier {
    queue: Arc<QueueService>,
    recipient: String,
}

impl ContactNotifier {
    pub fn new(queue: Arc<QueueService>, recipient: String) -> Self {
        Self { queue, recipient }
    }
}

pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    recaptcha: Option<Arc<RecaptchaService>>,
    notifier: Option<ContactNotifier>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self {
            repo,
            recaptcha: None,
            notifier: None,
        }
    }

    pub fn with_recaptcha(mut self, recaptcha: Arc<RecaptchaService>) -> Self {
        self.recaptcha = Some(recaptcha);
        self
    }

    pub fn with_notifier(mut self, notifier: ContactNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validate, verify and store a submission, then queue the notification.
    ///
    /// # Errors
    /// - `RecaptchaFailed` when verification is required and the token is
    ///   missing or rejected
    /// - `Validation` for malformed fields
    pub async fn create(&self, input: CreateContactInput) -> ServiceResult<Contact> {
        self.check_recaptcha(input.recaptcha_token.as_deref()).await?;

        let contact = Contact::new(
            validation::required("name", &input.name, MAX_NAME_LEN)?,
            validation::email("email", &input.email, MAX_EMAIL_LEN)?,
            validate_phone(input.phone)?,
            validation::optional("message", input.message, MAX_MESSAGE_LEN)?,
        );

        let created = self.repo.create(&contact).await?;
        info!("Stored contact {} from {}", created.id, created.email);
        self.notify(&created).await;
        Ok(created)
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Contact>> {
        Ok(self.repo.list().await?)
    }

    pub async fn find_one(&self, id: i64) -> ServiceResult<Contact> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact", id))
    }

    pub async fn update(&self, id: i64, input: UpdateContactInput) -> ServiceResult<Contact> {
        let mut contact = self.find_one(id).await?;

        if let Some(name) = input.name {
            contact.name = validation::required("name", &name, MAX_NAME_LEN)?;
        }
        if let Some(email) = input.email {
            contact.email = validation::email("email", &email, MAX_EMAIL_LEN)?;
        }
        if input.phone.is_some() {
            contact.phone = validate_phone(input.phone)?;
        }
        if input.message.is_some() {
            contact.message = validation::optional("message", input.message, MAX_MESSAGE_LEN)?;
        }

        Ok(self.repo.update(&contact).await?)
    }

    /// Delete a contact, returning the removed record
    pub async fn remove(&self, id: i64) -> ServiceResult<Contact> {
        let contact = self.find_one(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Contact", id));
        }
        Ok(contact)
    }

    async fn check_recaptcha(&self, token: Option<&str>) -> ServiceResult<()> {
        let Some(recaptcha) = self.recaptcha.as_ref().filter(|r| r.is_required()) else {
            return Ok(());
        };
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) if recaptcha.verify(token).await => Ok(()),
            _ => Err(ServiceError::RecaptchaFailed),
        }
    }

    /// Queue the owner notification. Failures are logged; the contact stays saved.
    async fn notify(&self, contact: &Contact) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let job = EmailJob {
            to: notifier.recipient.clone(),
            subject: format!("New contact from: {}", contact.name),
            template: CONTACT_TEMPLATE.to_string(),
            context: json!({
                "name": contact.name,
                "email": contact.email,
                "phone": contact.phone,
                "message": contact.message,
            }),
        };
        if let Err(e) = notifier.queue.add_email_to_queue(job).await {
            warn!("Failed to queue notification for contact {}: {:#}", contact.id, e);
        }
    }
}

fn validate_phone(phone: Option<String>) -> ServiceResult<Option<String>> {
    let phone = validation::optional("phone", phone, validation::MAX_PHONE_LEN)?;
    match phone {
        Some(p) if !validation::is_valid_phone(&p) => {
            Err(ServiceError::validation("phone must be a valid phone number"))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecaptchaConfig;
    use crate::db::repositories::SqlxContactRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::queue::{JobOptions, JobQueue, MemoryQueue, SEND_EMAIL_JOB};

    async fn setup_repo() -> Arc<dyn ContactRepository> {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxContactRepository::boxed(pool)
    }

    fn input(name: &str, email: &str) -> CreateContactInput {
        CreateContactInput {
            name: name.to_string(),
            email: email.to_string(),
            message: Some("I'd like a quote".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let service = ContactService::new(setup_repo().await);

        let created = service.create(input("Ana", "ana@example.com")).await.unwrap();
        let found = service.find_one(created.id).await.unwrap();

        assert_eq!(found.name, "Ana");
        assert_eq!(found.message.as_deref(), Some("I'd like a quote"));
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let service = ContactService::new(setup_repo().await);
        let result = service.create(input("Ana", "invalid-email")).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_and_long_message() {
        let service = ContactService::new(setup_repo().await);
        assert!(matches!(
            service.create(input("  ", "ana@example.com")).await,
            Err(ServiceError::Validation(_))
        ));

        let mut long = input("Ana", "ana@example.com");
        long.message = Some("x".repeat(MAX_MESSAGE_LEN + 1));
        assert!(matches!(service.create(long).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_validates_phone() {
        let service = ContactService::new(setup_repo().await);

        let mut ok = input("Ana", "ana@example.com");
        ok.phone = Some("+55 11 91234-5678".to_string());
        assert!(service.create(ok).await.is_ok());

        let mut bad = input("Ana", "ana@example.com");
        bad.phone = Some("not a phone".to_string());
        assert!(matches!(service.create(bad).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_partial() {
        let service = ContactService::new(setup_repo().await);
        let created = service.create(input("Ana", "ana@example.com")).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdateContactInput {
                    name: Some("Ana Maria".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "ana@example.com");
        assert_eq!(updated.message, created.message);
    }

    #[tokio::test]
    async fn test_missing_contact_is_not_found() {
        let service = ContactService::new(setup_repo().await);
        assert!(matches!(service.find_one(999).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            service.update(999, UpdateContactInput::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(service.remove(999).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_returns_record() {
        let service = ContactService::new(setup_repo().await);
        let created = service.create(input("Ana", "ana@example.com")).await.unwrap();

        let removed = service.remove(created.id).await.unwrap();

        assert_eq!(removed.id, created.id);
        assert!(matches!(service.find_one(created.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_queues_notification() {
        let queue = Arc::new(MemoryQueue::new());
        let queue_service = Arc::new(QueueService::new(queue.clone(), JobOptions::default()));
        let service = ContactService::new(setup_repo().await).with_notifier(ContactNotifier::new(
            queue_service,
            "owner@example.com".to_string(),
        ));

        service.create(input("Ana", "ana@example.com")).await.unwrap();

        let job = queue.reserve().await.unwrap().expect("notification not queued");
        assert_eq!(job.name, SEND_EMAIL_JOB);
        assert_eq!(job.payload["to"], "owner@example.com");
        assert_eq!(job.payload["subject"], "New contact from: Ana");
        assert_eq!(job.payload["context"]["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_required_recaptcha_rejects_missing_token() {
        let recaptcha = RecaptchaService::new(&RecaptchaConfig {
            secret_key: Some("secret".to_string()),
            verify_url: "http://127.0.0.1:1/siteverify".to_string(),
            required: true,
            timeout_secs: 1,
            ..Default::default()
        })
        .unwrap();
        let service = ContactService::new(setup_repo().await).with_recaptcha(Arc::new(recaptcha));

        let result = service.create(input("Ana", "ana@example.com")).await;
        assert!(matches!(result, Err(ServiceError::RecaptchaFailed)));

        let mut with_token = input("Ana", "ana@example.com");
        with_token.recaptcha_token = Some("token".to_string());
        // Endpoint unreachable, so verification fails closed.
        assert!(matches!(service.create(with_token).await, Err(ServiceError::RecaptchaFailed)));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    async fn required_recaptcha(score: f64) -> Arc<RecaptchaService> {
        let (url, _) = crate::recaptcha::tests::mock_endpoint(
            axum::http::StatusCode::OK,
            json!({ "success": true, "score": score }),
        )
        .await;
        let recaptcha = RecaptchaService::new(&RecaptchaConfig {
            secret_key: Some("secret".to_string()),
            verify_url: url,
            required: true,
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();
        Arc::new(recaptcha)
    }

    #[tokio::test]
    async fn test_required_recaptcha_accepts_high_score() {
        let service =
            ContactService::new(setup_repo().await).with_recaptcha(required_recaptcha(0.9).await);

        let mut submission = input("Ana", "ana@example.com");
        submission.recaptcha_token = Some("human".to_string());
        let created = service.create(submission).await.unwrap();

        assert_eq!(service.find_one(created.id).await.unwrap().name, "Ana");
    }

    #[tokio::test]
    async fn test_required_recaptcha_rejects_low_score() {
        let service =
            ContactService::new(setup_repo().await).with_recaptcha(required_recaptcha(0.3).await);

        let mut submission = input("Ana", "ana@example.com");
        submission.recaptcha_token = Some("bot".to_string());

        assert!(matches!(service.create(submission).await, Err(ServiceError::RecaptchaFailed)));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_optional_recaptcha_is_skipped() {
        let recaptcha = RecaptchaService::new(&RecaptchaConfig::default()).unwrap();
        let service = ContactService::new(setup_repo().await).with_recaptcha(Arc::new(recaptcha));

        assert!(service.create(input("Ana", "ana@example.com")).await.is_ok());
    }
}
