use super::error::GenerationError;
use crate::domain::credential::Credential;
use crate::domain::voice::{LanguageDetection, VoiceConfig};
use crate::infrastructure::audio::{decode_payload, CodecError, PcmFormat};
use crate::infrastructure::providers::SpeechProvider;
use std::sync::Arc;

/// Result of one successful segment generation
#[derive(Debug, Clone)]
pub struct GeneratedSegment {
    /// Text that was spoken (translated when a target language applies)
    pub text: String,
    pub audio: Arc<[u8]>,
}

/// One attempt at turning a piece of text into decoded samples:
/// optional translation, synthesis, payload decoding.
pub struct SegmentGenerator {
    provider: Arc<dyn SpeechProvider>,
    detection: Arc<LanguageDetection>,
}

impl SegmentGenerator {
    pub fn new(provider: Arc<dyn SpeechProvider>, detection: Arc<LanguageDetection>) -> Self {
        Self {
            provider,
            detection,
        }
    }

    pub async fn generate(
        &self,
        text: &str,
        voice: &VoiceConfig,
        credential: &Credential,
    ) -> Result<GeneratedSegment, GenerationError> {
        let spoken = self.prepare_text(text, voice, credential).await?;

        let output = self
            .provider
            .synthesize(&spoken, voice, credential)
            .await
            .map_err(GenerationError::SegmentGenerationFailed)?;

        let samples = decode_payload(&output.audio_payload)?;
        let block_align = PcmFormat::default().block_align();
        if samples.len() % block_align != 0 {
            return Err(CodecError::Misaligned {
                len: samples.len(),
                block_align,
            }
            .into());
        }

        Ok(GeneratedSegment {
            text: output.normalized_text,
            audio: Arc::from(samples),
        })
    }

    async fn prepare_text(
        &self,
        text: &str,
        voice: &VoiceConfig,
        credential: &Credential,
    ) -> Result<String, GenerationError> {
        let Some(target) = voice.language else {
            return Ok(text.to_string());
        };

        if self.detection.detect(text) == Some(target) {
            tracing::debug!(language = %target, "Text already in target language");
            return Ok(text.to_string());
        }

        let translated = self
            .provider
            .translate(text, target, credential)
            .await
            .map_err(GenerationError::TranslationFailed)?;

        if translated.is_empty() {
            tracing::warn!(language = %target, "Empty translation, using original text");
            return Ok(text.to_string());
        }
        Ok(translated)
    }
}
