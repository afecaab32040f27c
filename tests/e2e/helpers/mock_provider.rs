use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use parking_lot::Mutex;
use std::collections::HashMap;
use voice_studio_backend::domain::credential::Credential;
use voice_studio_backend::domain::voice::{LanguageCode, VoiceConfig};
use voice_studio_backend::infrastructure::providers::{
    ProviderError, ProviderErrorKind, SpeechProvider, SynthesisOutput,
};

/// Samples the mock returns for `text`: its bytes padded to whole frames
pub fn samples_for(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    if bytes.len() % 2 == 1 {
        bytes.push(0);
    }
    bytes
}

/// Stand-in for the remote speech provider
#[derive(Default)]
pub struct MockSpeechProvider {
    failures: Mutex<HashMap<String, ProviderErrorKind>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSpeechProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, text: &str, kind: ProviderErrorKind) {
        self.failures.lock().insert(text.to_string(), kind);
    }

    pub fn recover(&self, text: &str) {
        self.failures.lock().remove(text);
    }

    /// `(text, credential)` of every synthesis call
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn synthesize(
        &self,
        text: &str,
        _voice: &VoiceConfig,
        credential: &Credential,
    ) -> Result<SynthesisOutput, ProviderError> {
        self.calls
            .lock()
            .push((text.to_string(), credential.expose().to_string()));

        let failure = self.failures.lock().get(text).copied();
        if let Some(kind) = failure {
            return Err(ProviderError::new(kind, "mock failure"));
        }

        Ok(SynthesisOutput {
            audio_payload: BASE64.encode(samples_for(text)),
            normalized_text: text.to_string(),
        })
    }

    async fn translate(
        &self,
        text: &str,
        _target: LanguageCode,
        _credential: &Credential,
    ) -> Result<String, ProviderError> {
        Ok(text.to_string())
    }
}
