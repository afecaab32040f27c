use crate::domain::credential::Credential;
use crate::domain::voice::{LanguageCode, VoiceConfig};
use async_trait::async_trait;

/// Coarse cause of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    SafetyBlocked,
    RecitationBlocked,
    MalformedConfig,
    NoAudioReturned,
    Transport,
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::SafetyBlocked => "safety-blocked",
            ProviderErrorKind::RecitationBlocked => "recitation-blocked",
            ProviderErrorKind::MalformedConfig => "malformed-config",
            ProviderErrorKind::NoAudioReturned => "no-audio-returned",
            ProviderErrorKind::Transport => "transport-error",
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Successful synthesis: the transport-encoded sample stream plus the text
/// that was actually spoken, without any style prefix.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    pub audio_payload: String,
    pub normalized_text: String,
}

/// Remote speech synthesis and translation.
///
/// Implementations make exactly one attempt per call; retries are not
/// their concern.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Speak `text` with the given voice parameters.
    async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceConfig,
        credential: &Credential,
    ) -> Result<SynthesisOutput, ProviderError>;

    /// Text-only call rendering `text` in `target`. May return an empty
    /// string when the model produced nothing usable.
    async fn translate(
        &self,
        text: &str,
        target: LanguageCode,
        credential: &Credential,
    ) -> Result<String, ProviderError>;
}
