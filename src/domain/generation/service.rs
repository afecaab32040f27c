use super::batch::{BatchOrchestrator, BatchReport, BatchStatus};
use super::error::GenerationError;
use super::generator::SegmentGenerator;
use crate::domain::credential::{Credential, CredentialService};
use crate::domain::quota::QuotaService;
use crate::domain::segment::{Segment, SegmentId, SegmentStore};
use crate::domain::voice::VoiceConfig;
use crate::infrastructure::audio::{encode_container, PcmFormat};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Sentence spoken by voice previews
pub const PREVIEW_TEXT: &str = "Về nhà uống thử rượu gạo nấu kỹ để cảm nhận đủ vị";

/// Entry point for every generation path: whole batches, single segments
/// and voice previews.
///
/// Work is spawned onto the runtime so a dropped request never leaves
/// segments stuck in `pending`.
pub struct GenerationService {
    generator: Arc<SegmentGenerator>,
    orchestrator: Arc<BatchOrchestrator>,
    store: Arc<SegmentStore>,
    credentials: Arc<CredentialService>,
    quota: Arc<QuotaService>,
    preview_cache: Option<Cache<String, Arc<[u8]>>>,
}

impl GenerationService {
    pub fn new(
        generator: Arc<SegmentGenerator>,
        orchestrator: Arc<BatchOrchestrator>,
        store: Arc<SegmentStore>,
        credentials: Arc<CredentialService>,
        quota: Arc<QuotaService>,
        preview_cache_enabled: bool,
    ) -> Self {
        let preview_cache = preview_cache_enabled.then(|| {
            Cache::builder()
                .max_capacity(100)
                .time_to_idle(Duration::from_secs(30 * 60))
                .build()
        });

        Self {
            generator,
            orchestrator,
            store,
            credentials,
            quota,
            preview_cache,
        }
    }

    pub async fn run_batch(&self, voice: VoiceConfig) -> Result<BatchReport, GenerationError> {
        let pool = self.credentials.active_pool()?;

        let orchestrator = self.orchestrator.clone();
        tokio::spawn(async move { orchestrator.run(voice, pool).await })
            .await
            .map_err(|e| GenerationError::Dependency(format!("batch task failed: {}", e)))?
    }

    pub fn batch_status(&self) -> BatchStatus {
        self.orchestrator.status()
    }

    pub fn export_selected(&self) -> Result<Vec<u8>, GenerationError> {
        self.orchestrator.export_selected()
    }

    /// Generate or regenerate one segment on a round-robin credential.
    pub async fn generate_segment(
        &self,
        id: SegmentId,
        voice: VoiceConfig,
    ) -> Result<Segment, GenerationError> {
        if self.orchestrator.is_running() {
            return Err(GenerationError::BatchAlreadyRunning);
        }
        let pool = self.credentials.active_pool()?;
        if pool.is_shared() {
            self.quota.try_reserve(1).await?;
        }

        let segment = self.orchestrator.claim_segment(id)?;

        let (index, credential) = pool.next();
        tracing::info!(segment_id = %id, credential_index = index, "Generating segment");

        tokio::spawn(generate_into_store(
            self.generator.clone(),
            self.store.clone(),
            self.quota.clone(),
            segment,
            voice,
            credential.clone(),
            pool.is_shared(),
        ))
        .await
        .map_err(|e| GenerationError::Dependency(format!("generation task failed: {}", e)))?
    }

    /// Speak the fixed preview sentence. Nothing is stored in the segment
    /// store; cache hits are free.
    pub async fn preview(&self, voice: VoiceConfig) -> Result<Vec<u8>, GenerationError> {
        let key = voice.cache_key();
        if let Some(cache) = &self.preview_cache {
            if let Some(samples) = cache.get(&key).await {
                tracing::info!(voice = %voice.voice_name, "Preview cache hit");
                return Ok(encode_container(&samples, PcmFormat::default())?);
            }
        }

        let pool = self.credentials.active_pool()?;
        if pool.is_shared() {
            self.quota.try_reserve(1).await?;
        }
        let (_, credential) = pool.next();

        let generated = self
            .generator
            .generate(PREVIEW_TEXT, &voice, credential)
            .await?;
        if pool.is_shared() {
            self.quota.record_success().await;
        }

        if let Some(cache) = &self.preview_cache {
            cache.insert(key, generated.audio.clone()).await;
        }

        Ok(encode_container(&generated.audio, PcmFormat::default())?)
    }
}

/// Single-shot attempt for a segment already marked pending.
async fn generate_into_store(
    generator: Arc<SegmentGenerator>,
    store: Arc<SegmentStore>,
    quota: Arc<QuotaService>,
    segment: Segment,
    voice: VoiceConfig,
    credential: Credential,
    shared: bool,
) -> Result<Segment, GenerationError> {
    let id = segment.id();
    match generator.generate(segment.text(), &voice, &credential).await {
        Ok(generated) => {
            let updated = store.update(id, |s| {
                s.complete(generated.text, generated.audio);
                Ok(())
            })?;
            if shared {
                quota.record_success().await;
            }
            Ok(updated)
        }
        Err(e) => {
            tracing::warn!(segment_id = %id, error = %e, "Segment generation failed");
            let detail = e.to_string();
            store.update(id, |s| {
                s.fail(detail);
                Ok(())
            })?;
            Err(e)
        }
    }
}
