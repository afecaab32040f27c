use super::model::SegmentId;
use crate::error::AppError;
use crate::infrastructure::audio::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error("segment {0} not found")]
    NotFound(SegmentId),
    #[error("segment {0} is being generated")]
    Busy(SegmentId),
    #[error("segment {0} has no generated audio")]
    NotCompleted(SegmentId),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<SegmentError> for AppError {
    fn from(err: SegmentError) -> Self {
        match err {
            SegmentError::NotFound(_) => AppError::NotFound(err.to_string()),
            SegmentError::Busy(_) => AppError::Conflict(err.to_string()),
            SegmentError::NotCompleted(_) | SegmentError::Invalid(_) => {
                AppError::BadRequest(err.to_string())
            }
            SegmentError::Codec(e) => AppError::Internal(e.to_string()),
        }
    }
}
