use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum QuotaServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    #[error("submission too large: {0}")]
    TooLarge(String),
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for QuotaServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::RateLimitExceeded(msg) => QuotaServiceError::LimitExceeded(msg),
            AppError::PayloadTooLarge(msg) => QuotaServiceError::TooLarge(msg),
            AppError::BadRequest(msg) => QuotaServiceError::Invalid(msg),
            AppError::NotFound(_) => QuotaServiceError::NotFound,
            _ => QuotaServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<QuotaServiceError> for AppError {
    fn from(err: QuotaServiceError) -> Self {
        match err {
            QuotaServiceError::LimitExceeded(msg) => AppError::RateLimitExceeded(msg),
            QuotaServiceError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            QuotaServiceError::Invalid(msg) => AppError::BadRequest(msg),
            QuotaServiceError::NotFound => AppError::NotFound("User not found".to_string()),
            QuotaServiceError::Dependency(msg) => AppError::Internal(msg),
            QuotaServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
