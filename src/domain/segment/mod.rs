pub mod dto;
pub mod error;
pub mod model;
pub mod segmenter;
pub mod service;
pub mod store;

pub use error::SegmentError;
pub use model::{Segment, SegmentId, SegmentStatus};
pub use segmenter::{segment_text, split_sentences, DEFAULT_MAX_WORDS};
pub use service::SegmentService;
pub use store::SegmentStore;
