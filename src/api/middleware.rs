//! Shared API state, error type and request extractors

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::db::repositories::{
    SqlxConfigEntryRepository, SqlxContactRepository, SqlxContentRepository, SqlxPageRepository,
    SqlxPostRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{
    ConfigEntryService, ContactService, ContentService, PageService, PostService, ServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub contact_service: Arc<ContactService>,
    pub page_service: Arc<PageService>,
    pub post_service: Arc<PostService>,
    pub content_service: Arc<ContentService>,
    pub config_service: Arc<ConfigEntryService>,
}

impl AppState {
    /// Build the entity services on top of `pool`.
    ///
    /// The contact service is passed in already wired, since it carries
    /// the reCAPTCHA and notification collaborators.
    pub fn new(pool: DynDatabasePool, contact_service: ContactService) -> Self {
        Self {
            contact_service: Arc::new(contact_service),
            page_service: Arc::new(PageService::new(SqlxPageRepository::boxed(pool.clone()))),
            post_service: Arc::new(PostService::new(SqlxPostRepository::boxed(pool.clone()))),
            content_service: Arc::new(ContentService::new(SqlxContentRepository::boxed(
                pool.clone(),
            ))),
            config_service: Arc::new(ConfigEntryService::new(SqlxConfigEntryRepository::boxed(
                pool.clone(),
            ))),
            pool,
        }
    }

    /// State with a bare contact service, no reCAPTCHA or notifications
    pub fn with_defaults(pool: DynDatabasePool) -> Self {
        let contacts = ContactService::new(SqlxContactRepository::boxed(pool.clone()));
        Self::new(pool, contacts)
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn recaptcha_failed(message: impl Into<String>) -> Self {
        Self::new("RECAPTCHA_FAILED", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" | "RECAPTCHA_FAILED" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Validation(msg) => Self::validation_error(msg),
            ServiceError::Conflict(msg) => Self::conflict(msg),
            ServiceError::RecaptchaFailed => Self::recaptcha_failed("reCAPTCHA verification failed"),
            ServiceError::Internal(e) => {
                error!("Request failed: {:#}", e);
                Self::internal_error("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

/// JSON body extractor whose rejections use the API error format
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
