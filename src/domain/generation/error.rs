use crate::domain::credential::CredentialError;
use crate::domain::quota::QuotaExceeded;
use crate::domain::segment::{SegmentError, SegmentId};
use crate::error::AppError;
use crate::infrastructure::audio::CodecError;
use crate::infrastructure::providers::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    QuotaExceeded(#[from] QuotaExceeded),
    #[error("a batch is already running")]
    BatchAlreadyRunning,
    #[error("segment {0} not found")]
    SegmentNotFound(SegmentId),
    #[error("segment {0} is being generated")]
    SegmentBusy(SegmentId),
    #[error("{0}")]
    InvalidCredential(String),
    #[error("generation failed ({0})")]
    SegmentGenerationFailed(ProviderError),
    #[error("translation failed ({0})")]
    TranslationFailed(ProviderError),
    #[error("{0}")]
    NoAudioProduced(String),
    #[error("malformed audio: {0}")]
    Codec(#[from] CodecError),
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<CredentialError> for GenerationError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Quota(e) => GenerationError::QuotaExceeded(e),
            CredentialError::Dependency(msg) => GenerationError::Dependency(msg),
            other => GenerationError::InvalidCredential(other.to_string()),
        }
    }
}

impl From<SegmentError> for GenerationError {
    fn from(err: SegmentError) -> Self {
        match err {
            SegmentError::NotFound(id) => GenerationError::SegmentNotFound(id),
            SegmentError::Busy(id) => GenerationError::SegmentBusy(id),
            SegmentError::Codec(e) => GenerationError::Codec(e),
            other => GenerationError::Dependency(other.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::QuotaExceeded(e) => AppError::QuotaExceeded(e.to_string()),
            GenerationError::BatchAlreadyRunning | GenerationError::SegmentBusy(_) => {
                AppError::Conflict(err.to_string())
            }
            GenerationError::SegmentNotFound(_) => AppError::NotFound(err.to_string()),
            GenerationError::InvalidCredential(msg) => AppError::InvalidCredential(msg),
            GenerationError::SegmentGenerationFailed(_) | GenerationError::TranslationFailed(_) => {
                AppError::ExternalService(err.to_string())
            }
            GenerationError::NoAudioProduced(msg) => AppError::NoAudioProduced(msg),
            GenerationError::Codec(e) => AppError::Internal(e.to_string()),
            GenerationError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}
