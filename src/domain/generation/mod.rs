pub mod batch;
pub mod error;
pub mod generator;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchOrchestrator, BatchReport, BatchState, BatchStatus};
pub use error::GenerationError;
pub use generator::{GeneratedSegment, SegmentGenerator};
pub use service::{GenerationService, PREVIEW_TEXT};
