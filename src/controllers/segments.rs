use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use super::wav_response;
use crate::domain::segment::dto::{
    EditSegmentRequest, LoadTextRequest, SegmentListResponse, SegmentResponse, SelectAllResponse,
};
use crate::domain::segment::{SegmentId, SegmentService};
use crate::error::AppResult;

pub struct SegmentController {
    segment_service: Arc<SegmentService>,
}

impl SegmentController {
    pub fn new(segment_service: Arc<SegmentService>) -> Self {
        Self { segment_service }
    }

    /// POST /api/segments - Segment a text into the session
    pub async fn load_text(
        State(controller): State<Arc<SegmentController>>,
        Json(request): Json<LoadTextRequest>,
    ) -> AppResult<Json<SegmentListResponse>> {
        let segments = controller
            .segment_service
            .load_text(request.text, request.max_words)?;
        Ok(Json(SegmentListResponse::from_segments(&segments)))
    }

    /// GET /api/segments
    pub async fn list(
        State(controller): State<Arc<SegmentController>>,
    ) -> AppResult<Json<SegmentListResponse>> {
        let segments = controller.segment_service.list();
        Ok(Json(SegmentListResponse::from_segments(&segments)))
    }

    /// PATCH /api/segments/:id - Edit a segment's text
    pub async fn edit(
        State(controller): State<Arc<SegmentController>>,
        Path(id): Path<SegmentId>,
        Json(request): Json<EditSegmentRequest>,
    ) -> AppResult<Json<SegmentResponse>> {
        let segment = controller.segment_service.edit_text(id, request.text)?;
        Ok(Json(SegmentResponse::from(&segment)))
    }

    /// POST /api/segments/:id/selection
    pub async fn toggle_selected(
        State(controller): State<Arc<SegmentController>>,
        Path(id): Path<SegmentId>,
    ) -> AppResult<Json<SegmentResponse>> {
        let segment = controller.segment_service.toggle_selected(id)?;
        Ok(Json(SegmentResponse::from(&segment)))
    }

    /// POST /api/segments/selection - Select or clear every completed segment
    pub async fn toggle_select_all(
        State(controller): State<Arc<SegmentController>>,
    ) -> AppResult<Json<SelectAllResponse>> {
        let selected = controller.segment_service.toggle_select_all()?;
        Ok(Json(SelectAllResponse { selected }))
    }

    /// GET /api/segments/:id/audio
    pub async fn audio(
        State(controller): State<Arc<SegmentController>>,
        Path(id): Path<SegmentId>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let container = controller.segment_service.segment_audio(id)?;
        wav_response("segment", container, &[])
    }
}
