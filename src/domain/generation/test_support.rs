use crate::domain::credential::{Credential, CredentialPool, CredentialSource};
use crate::domain::quota::{QuotaService, UsageWindow};
use crate::domain::voice::{LanguageCode, VoiceConfig};
use crate::infrastructure::providers::{
    ProviderError, ProviderErrorKind, SpeechProvider, SynthesisOutput,
};
use crate::infrastructure::repositories::{InMemorySettingsRepository, UsageRepository};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Deterministic samples for `text`: its bytes, padded to whole frames.
pub fn samples_for(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    if bytes.len() % 2 == 1 {
        bytes.push(0);
    }
    bytes
}

/// Provider whose behaviour is scripted per input text
#[derive(Default)]
pub struct ScriptedProvider {
    failures: Mutex<HashMap<String, ProviderErrorKind>>,
    delays: Mutex<HashMap<String, Duration>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    translations: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<(String, String)>>,
    translate_calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, text: &str, kind: ProviderErrorKind) {
        self.failures.lock().insert(text.to_string(), kind);
    }

    pub fn heal(&self, text: &str) {
        self.failures.lock().remove(text);
    }

    pub fn delay(&self, text: &str, delay: Duration) {
        self.delays.lock().insert(text.to_string(), delay);
    }

    /// Hold synthesis of `text` until the returned handle is notified
    pub fn gate(&self, text: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(text.to_string(), notify.clone());
        notify
    }

    pub fn translate_to(&self, text: &str, translated: &str) {
        self.translations
            .lock()
            .insert(text.to_string(), translated.to_string());
    }

    /// `(text, credential)` of every synthesis call in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn translate_calls(&self) -> Vec<String> {
        self.translate_calls.lock().clone()
    }
}

#[async_trait]
impl SpeechProvider for ScriptedProvider {
    async fn synthesize(
        &self,
        text: &str,
        _voice: &VoiceConfig,
        credential: &Credential,
    ) -> Result<SynthesisOutput, ProviderError> {
        self.calls
            .lock()
            .push((text.to_string(), credential.expose().to_string()));

        let gate = self.gates.lock().get(text).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let delay = self.delays.lock().get(text).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().get(text).copied();
        if let Some(kind) = failure {
            return Err(ProviderError::new(kind, format!("scripted failure for {}", text)));
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
        self.translate_calls.lock().push(text.to_string());
        let failure = self.failures.lock().get(text).copied();
        if failure == Some(ProviderErrorKind::Transport) {
            return Err(ProviderError::new(ProviderErrorKind::Transport, "translation down"));
        }
        Ok(self
            .translations
            .lock()
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}

/// Voice settings that skip the translation step
pub fn plain_voice() -> VoiceConfig {
    VoiceConfig {
        language: None,
        ..VoiceConfig::default()
    }
}

pub fn user_pool(keys: &[&str]) -> CredentialPool {
    CredentialPool::new(
        keys.iter().map(|k| Credential::new(*k)).collect(),
        CredentialSource::User,
    )
    .expect("test pool is non-empty")
}

pub fn shared_pool() -> CredentialPool {
    CredentialPool::new(vec![Credential::new("shared-key")], CredentialSource::Shared)
        .expect("test pool is non-empty")
}

pub async fn quota_with(count: u32, max_usage: u32) -> Arc<QuotaService> {
    let repository = Arc::new(UsageRepository::new(Arc::new(
        InMemorySettingsRepository::new(),
    )));
    let start = (count > 0).then(chrono::Utc::now);
    repository
        .save_window(&UsageWindow::new(count, start))
        .await
        .expect("in-memory save");
    Arc::new(
        QuotaService::load(repository, max_usage, chrono::Duration::minutes(120))
            .await
            .expect("in-memory load"),
    )
}
