use crate::domain::quota::QuotaExceeded;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("no credentials configured")]
    NotConfigured,
    #[error("{0}")]
    Invalid(String),
    #[error("no shared credential is available on this server")]
    SharedUnavailable,
    #[error(transparent)]
    Quota(#[from] QuotaExceeded),
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<AppError> for CredentialError {
    fn from(err: AppError) -> Self {
        CredentialError::Dependency(err.to_string())
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NotConfigured
            | CredentialError::Invalid(_)
            | CredentialError::SharedUnavailable => AppError::InvalidCredential(err.to_string()),
            CredentialError::Quota(e) => AppError::QuotaExceeded(e.to_string()),
            CredentialError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
