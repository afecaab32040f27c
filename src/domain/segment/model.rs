use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub type SegmentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    Idle,
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for SegmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            SegmentStatus::Idle => "idle",
            SegmentStatus::Pending => "pending",
            SegmentStatus::Completed => "completed",
            SegmentStatus::Failed => "failed",
        };
        write!(f, "{}", status)
    }
}

/// Unit of generation work and its result.
///
/// Fields are private so the status/payload invariant can only move through
/// the transition methods: the payload exists iff the status is `Completed`,
/// and `selected` drops to `false` whenever the segment leaves `Completed`.
#[derive(Debug, Clone)]
pub struct Segment {
    id: SegmentId,
    text: String,
    status: SegmentStatus,
    audio: Option<Arc<[u8]>>,
    error_detail: Option<String>,
    selected: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            status: SegmentStatus::Idle,
            audio: None,
            error_detail: None,
            selected: false,
        }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> SegmentStatus {
        self.status
    }

    pub fn audio(&self) -> Option<&Arc<[u8]>> {
        self.audio.as_ref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_completed(&self) -> bool {
        self.status == SegmentStatus::Completed
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn mark_pending(&mut self) {
        self.status = SegmentStatus::Pending;
        self.audio = None;
        self.error_detail = None;
        self.selected = false;
    }

    pub fn complete(&mut self, normalized_text: String, audio: Arc<[u8]>) {
        self.text = normalized_text;
        self.status = SegmentStatus::Completed;
        self.audio = Some(audio);
        self.error_detail = None;
    }

    pub fn fail(&mut self, detail: impl Into<String>) {
        self.status = SegmentStatus::Failed;
        self.audio = None;
        self.error_detail = Some(detail.into());
        self.selected = false;
    }

    /// Returns `false` (and leaves the flag alone) unless the segment is completed.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if !self.is_completed() {
            self.selected = false;
            return false;
        }
        self.selected = selected;
        true
    }
}
