use super::messages::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::domain::credential::Credential;
use crate::domain::voice::{LanguageCode, VoiceConfig};
use crate::infrastructure::providers::speech_provider::{
    ProviderError, ProviderErrorKind, SpeechProvider, SynthesisOutput,
};
use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_TRANSLATION_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub tts_model: String,
    pub translation_model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            translation_model: DEFAULT_TRANSLATION_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Gemini `generateContent` client for speech and translation
pub struct GeminiSpeechProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiSpeechProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        credential: &Credential,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", credential.expose())])
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Transport, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status, &body));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                ProviderError::new(
                    ProviderErrorKind::Transport,
                    format!("unreadable response: {}", e),
                )
            })
    }
}

#[async_trait]
impl SpeechProvider for GeminiSpeechProvider {
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceConfig,
        credential: &Credential,
    ) -> Result<SynthesisOutput, ProviderError> {
        let start_time = Instant::now();
        let request = GenerateContentRequest::text(voice.synthesis_prompt(text))
            .with_generation_config(GenerationConfig::audio(&voice.voice_name, voice.temperature));

        tracing::debug!(
            model = %self.config.tts_model,
            voice = %voice.voice_name,
            text_length = text.len(),
            credential = %credential.masked(),
            "Calling speech synthesis"
        );

        let response = self
            .generate(&self.config.tts_model, &request, credential)
            .await
            .inspect_err(|e| {
                tracing::warn!(kind = %e.kind, error = %e.message, "Speech synthesis failed");
            })?;
        let audio_payload = extract_audio(&response)?;

        tracing::info!(
            model = %self.config.tts_model,
            payload_length = audio_payload.len(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Speech synthesized"
        );

        Ok(SynthesisOutput {
            audio_payload,
            normalized_text: text.to_string(),
        })
    }

    async fn translate(
        &self,
        text: &str,
        target: LanguageCode,
        credential: &Credential,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::text(translation_prompt(text, target));
        let response = self
            .generate(&self.config.translation_model, &request, credential)
            .await?;

        let translated = response.first_text().map(clean_translation).unwrap_or_default();
        if translated.is_empty() {
            tracing::warn!(target_language = %target, "Translation returned no text");
        }
        Ok(translated)
    }
}

fn translation_prompt(text: &str, target: LanguageCode) -> String {
    let language = target.name();
    format!(
        "You are a professional translator. Target language: {language}.\n\
         1. Detect the language of the provided text.\n\
         2. If the text is already in {language}, return it exactly as is.\n\
         3. Otherwise translate it into natural, high-quality {language}.\n\
         4. Output only the final text, without notes, explanations or quotes.\n\n\
         Text to process:\n\"{text}\""
    )
}

/// Trim and drop one pair of wrapping quotes the model sometimes adds.
fn clean_translation(raw: &str) -> String {
    static QUOTES: OnceLock<Regex> = OnceLock::new();
    let quotes = QUOTES.get_or_init(|| Regex::new(r#"^["']|["']$"#).expect("quote pattern is a valid regex"));
    quotes.replace_all(raw.trim(), "").trim().to_string()
}

fn extract_audio(response: &GenerateContentResponse) -> Result<String, ProviderError> {
    if let Some(inline) = response.first_inline_data() {
        if !inline.data.is_empty() {
            return Ok(inline.data.clone());
        }
    }

    let finish_reason = response
        .first_candidate()
        .and_then(|c| c.finish_reason.as_deref());

    match finish_reason {
        Some("SAFETY") => Err(ProviderError::new(
            ProviderErrorKind::SafetyBlocked,
            "content blocked by the safety filter",
        )),
        Some("RECITATION") => Err(ProviderError::new(
            ProviderErrorKind::RecitationBlocked,
            "content blocked as recitation",
        )),
        _ if response.first_text().is_some() => Err(ProviderError::new(
            ProviderErrorKind::NoAudioReturned,
            "model returned text instead of audio; try a simpler style instruction",
        )),
        _ => Err(ProviderError::new(
            ProviderErrorKind::NoAudioReturned,
            "no audio data in response",
        )),
    }
}

fn classify_http_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("provider returned HTTP {}", status.as_u16()));

    let kind = if status == StatusCode::BAD_REQUEST {
        ProviderErrorKind::MalformedConfig
    } else {
        ProviderErrorKind::Transport
    };
    ProviderError::new(kind, message)
}
