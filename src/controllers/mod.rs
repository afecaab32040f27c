pub mod credentials;
pub mod generation;
pub mod health;
pub mod segments;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
};
use chrono::Utc;

use crate::error::{AppError, AppResult};

/// `audio/wav` download named `voice-studio-<kind>-<epoch ms>.wav`
pub(crate) fn wav_response(
    kind: &str,
    container: Vec<u8>,
    extra_headers: &[(&'static str, String)],
) -> AppResult<(StatusCode, HeaderMap, Body)> {
    let filename = format!("voice-studio-{}-{}.wav", kind, Utc::now().timestamp_millis());

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/wav"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("attachment; filename=\"{}\"", filename))?,
    );
    for (name, value) in extra_headers {
        headers.insert(*name, header_value(value)?);
    }

    Ok((StatusCode::OK, headers, Body::from(container)))
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::Internal(e.to_string()))
}
