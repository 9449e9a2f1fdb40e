//! Service layer errors

/// Error returned by every entity service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Input failed field validation
    #[error("{0}")]
    Validation(String),

    /// Unique field already taken
    #[error("{0}")]
    Conflict(String),

    /// reCAPTCHA token missing or rejected
    #[error("reCAPTCHA verification failed")]
    RecaptchaFailed,

    /// Database or other infrastructure failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Map a failed insert or update. A UNIQUE violation means another
    /// request claimed the slug or key after our own check.
    pub fn from_write(err: anyhow::Error, conflict: impl FnOnce() -> String) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict(conflict())
        } else {
            Self::Internal(err)
        }
    }
}

/// Whether any cause in the chain is a database UNIQUE constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    })
}
