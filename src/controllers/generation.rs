use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use super::wav_response;
use crate::domain::generation::{BatchStatus, GenerationService};
use crate::domain::segment::dto::SegmentResponse;
use crate::domain::segment::SegmentId;
use crate::domain::voice::dto::{GenerateRequest, LanguageInfo, VoiceInfo, VoicesResponse};
use crate::domain::voice::{LanguageCode, VoiceConfig, PREBUILT_VOICES};
use crate::error::{AppError, AppResult};

pub const X_SEGMENTS_COMPLETED: &str = "x-segments-completed";
pub const X_SEGMENTS_FAILED: &str = "x-segments-failed";

pub struct GenerationController {
    generation_service: Arc<GenerationService>,
}

impl GenerationController {
    pub fn new(generation_service: Arc<GenerationService>) -> Self {
        Self { generation_service }
    }

    /// POST /api/batch - Generate every unfinished segment and download the result
    pub async fn run_batch(
        State(controller): State<Arc<GenerationController>>,
        body: Bytes,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let voice = voice_config(body)?;
        let report = controller.generation_service.run_batch(voice).await?;

        wav_response(
            "full",
            report.container,
            &[
                (X_SEGMENTS_COMPLETED, report.completed.to_string()),
                (X_SEGMENTS_FAILED, report.failed.to_string()),
            ],
        )
    }

    /// GET /api/batch - State of the current or last batch
    pub async fn batch_status(
        State(controller): State<Arc<GenerationController>>,
    ) -> AppResult<Json<BatchStatus>> {
        Ok(Json(controller.generation_service.batch_status()))
    }

    /// POST /api/segments/:id/generate - Generate or regenerate one segment
    pub async fn generate_segment(
        State(controller): State<Arc<GenerationController>>,
        Path(id): Path<SegmentId>,
        body: Bytes,
    ) -> AppResult<Json<SegmentResponse>> {
        let voice = voice_config(body)?;
        let segment = controller
            .generation_service
            .generate_segment(id, voice)
            .await?;
        Ok(Json(SegmentResponse::from(&segment)))
    }

    /// POST /api/export/selected - Download the selected segments only
    pub async fn export_selected(
        State(controller): State<Arc<GenerationController>>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let container = controller.generation_service.export_selected()?;
        wav_response("selected", container, &[])
    }

    /// POST /api/voices/preview
    pub async fn preview(
        State(controller): State<Arc<GenerationController>>,
        body: Bytes,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let voice = voice_config(body)?;
        let container = controller.generation_service.preview(voice).await?;
        wav_response("preview", container, &[])
    }

    /// GET /api/voices
    pub async fn voices() -> Json<VoicesResponse> {
        Json(VoicesResponse {
            voices: PREBUILT_VOICES
                .iter()
                .map(|(name, description)| VoiceInfo {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
            languages: LanguageCode::ALL
                .iter()
                .map(|l| LanguageInfo {
                    code: l.as_str().to_string(),
                    name: l.name().to_string(),
                })
                .collect(),
        })
    }
}

/// An empty body means default voice settings; anything else must be a
/// valid `GenerateRequest`.
fn voice_config(body: Bytes) -> AppResult<VoiceConfig> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateRequest::default()
    } else {
        serde_json::from_slice::<GenerateRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?
    };
    VoiceConfig::try_from(request.voice).map_err(AppError::BadRequest)
}
