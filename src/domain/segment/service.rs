use super::error::SegmentError;
use super::model::{Segment, SegmentId, SegmentStatus};
use super::segmenter::segment_text;
use super::store::SegmentStore;
use crate::infrastructure::audio::{encode_container, PcmFormat};
use std::sync::Arc;

/// Upper bound accepted for a caller-supplied words-per-chunk limit
const MAX_WORDS_CEILING: usize = 2000;

/// Session-level operations over the segment store: loading text, editing
/// and selecting segments, and per-segment artifacts.
pub struct SegmentService {
    store: Arc<SegmentStore>,
    default_max_words: usize,
}

impl SegmentService {
    pub fn new(store: Arc<SegmentStore>, default_max_words: usize) -> Self {
        Self {
            store,
            default_max_words,
        }
    }

    /// Segment `text` into the store.
    ///
    /// When `text` is exactly what the current segments came from, they are
    /// kept along with any generated audio.
    pub fn load_text(
        &self,
        text: String,
        max_words: Option<usize>,
    ) -> Result<Vec<Segment>, SegmentError> {
        if text.trim().is_empty() {
            return Err(SegmentError::Invalid("Text cannot be empty".to_string()));
        }

        let max_words = max_words.unwrap_or(self.default_max_words);
        if max_words == 0 || max_words > MAX_WORDS_CEILING {
            return Err(SegmentError::Invalid(format!(
                "max_words must be between 1 and {}",
                MAX_WORDS_CEILING
            )));
        }

        let current = self.store.snapshot();
        if let Some(busy) = current.iter().find(|s| s.status() == SegmentStatus::Pending) {
            return Err(SegmentError::Busy(busy.id()));
        }

        if self.store.source_text().as_deref() == Some(text.as_str()) && !current.is_empty() {
            tracing::debug!(segments = current.len(), "Text unchanged, keeping segments");
            return Ok(current);
        }

        let chunks = segment_text(&text, max_words);
        let segments = self.store.replace_all(text, chunks);

        tracing::info!(
            segment_count = segments.len(),
            max_words = max_words,
            "Text segmented"
        );

        Ok(segments)
    }

    pub fn list(&self) -> Vec<Segment> {
        self.store.snapshot()
    }

    pub fn edit_text(&self, id: SegmentId, text: String) -> Result<Segment, SegmentError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(SegmentError::Invalid("Segment text cannot be empty".to_string()));
        }
        self.store.edit_text(id, text)
    }

    pub fn toggle_selected(&self, id: SegmentId) -> Result<Segment, SegmentError> {
        self.store.toggle_selected(id)
    }

    pub fn toggle_select_all(&self) -> Result<bool, SegmentError> {
        self.store
            .toggle_select_all()
            .ok_or_else(|| SegmentError::Invalid("No completed segments to select".to_string()))
    }

    /// Container for one completed segment.
    pub fn segment_audio(&self, id: SegmentId) -> Result<Vec<u8>, SegmentError> {
        let segment = self.store.get(id).ok_or(SegmentError::NotFound(id))?;
        let audio = segment.audio().ok_or(SegmentError::NotCompleted(id))?;
        Ok(encode_container(audio, PcmFormat::default())?)
    }
}
