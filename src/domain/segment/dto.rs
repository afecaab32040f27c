use super::model::{Segment, SegmentId, SegmentStatus};
use serde::{Deserialize, Serialize};

/// Request for POST /api/segments
#[derive(Debug, Serialize, Deserialize)]
pub struct LoadTextRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
}

/// Request for PATCH /api/segments/:id
#[derive(Debug, Serialize, Deserialize)]
pub struct EditSegmentRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentResponse {
    pub id: SegmentId,
    pub text: String,
    pub status: SegmentStatus,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    pub audio_bytes: usize,
}

impl From<&Segment> for SegmentResponse {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id(),
            text: segment.text().to_string(),
            status: segment.status(),
            selected: segment.is_selected(),
            error_detail: segment.error_detail().map(str::to_string),
            audio_bytes: segment.audio().map(|a| a.len()).unwrap_or(0),
        }
    }
}

/// Response for GET /api/segments
#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentListResponse {
    pub segments: Vec<SegmentResponse>,
    pub full_text: String,
    pub completed: usize,
    pub selected: usize,
}

impl SegmentListResponse {
    pub fn from_segments(segments: &[Segment]) -> Self {
        Self {
            full_text: segments
                .iter()
                .map(Segment::text)
                .collect::<Vec<_>>()
                .join(" "),
            completed: segments.iter().filter(|s| s.is_completed()).count(),
            selected: segments.iter().filter(|s| s.is_selected()).count(),
            segments: segments.iter().map(SegmentResponse::from).collect(),
        }
    }
}

/// Response for POST /api/segments/selection
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectAllResponse {
    pub selected: bool,
}
