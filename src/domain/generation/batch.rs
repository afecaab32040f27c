use super::error::GenerationError;
use super::generator::SegmentGenerator;
use crate::domain::credential::{Credential, CredentialPool};
use crate::domain::quota::QuotaService;
use crate::domain::segment::{Segment, SegmentError, SegmentId, SegmentStatus, SegmentStore};
use crate::domain::voice::VoiceConfig;
use crate::infrastructure::audio::{concatenate, encode_container, PcmFormat};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// State and counters of the current or most recent batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatus {
    pub state: BatchState,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub workers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for BatchStatus {
    fn default() -> Self {
        Self {
            state: BatchState::Idle,
            total: 0,
            completed: 0,
            failed: 0,
            workers: 0,
            started_at: None,
            finished_at: None,
        }
    }
}

/// Outcome of a finished batch with at least one audible segment
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub completed: usize,
    pub failed: usize,
    pub container: Vec<u8>,
}

type Results = Mutex<HashMap<SegmentId, Arc<[u8]>>>;

/// Runs every not-yet-completed segment through a pool of workers, one per
/// credential, and reassembles the audio in segmentation order.
///
/// At most one batch runs at a time. Each worker keeps its credential for
/// the whole batch and claims segments from a shared queue until it is
/// empty. Results are published to the store as they land.
pub struct BatchOrchestrator {
    generator: Arc<SegmentGenerator>,
    store: Arc<SegmentStore>,
    quota: Arc<QuotaService>,
    status: Mutex<BatchStatus>,
}

impl BatchOrchestrator {
    pub fn new(
        generator: Arc<SegmentGenerator>,
        store: Arc<SegmentStore>,
        quota: Arc<QuotaService>,
    ) -> Self {
        Self {
            generator,
            store,
            quota,
            status: Mutex::new(BatchStatus::default()),
        }
    }

    pub fn status(&self) -> BatchStatus {
        self.status.lock().clone()
    }

    pub fn is_running(&self) -> bool {
        self.status.lock().state == BatchState::Running
    }

    pub async fn run(
        &self,
        voice: VoiceConfig,
        pool: CredentialPool,
    ) -> Result<BatchReport, GenerationError> {
        let mut run = self.begin(pool.len())?;
        let start_time = Instant::now();

        let order = self.store.snapshot();
        let work: Vec<SegmentId> = order
            .iter()
            .filter(|s| !s.is_completed())
            .map(Segment::id)
            .collect();

        if pool.is_shared() && !work.is_empty() {
            self.quota.try_reserve(work.len() as u32).await?;
        }

        run.set_total(work.len());
        self.store.mark_pending(&work);

        tracing::info!(
            segments = order.len(),
            work_set = work.len(),
            workers = pool.len(),
            shared = pool.is_shared(),
            "Batch started"
        );

        let queue = Mutex::new(work.into_iter().collect::<VecDeque<_>>());
        let results: Results = Mutex::new(HashMap::new());

        let workers = pool.iter().enumerate().map(|(index, credential)| {
            self.worker(index, credential, &voice, &queue, &results, pool.is_shared())
        });
        join_all(workers).await;

        let status = run.finish();
        tracing::info!(
            completed = status.completed,
            failed = status.failed,
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Batch finished"
        );

        let container = reassemble(&order, &results.into_inner())?;
        Ok(BatchReport {
            completed: status.completed,
            failed: status.failed,
            container,
        })
    }

    /// Container of the selected completed segments in segmentation order.
    /// No generation happens here.
    pub fn export_selected(&self) -> Result<Vec<u8>, GenerationError> {
        let buffers: Vec<Arc<[u8]>> = self
            .store
            .snapshot()
            .iter()
            .filter(|s| s.is_selected() && s.is_completed())
            .filter_map(|s| s.audio().cloned())
            .collect();

        if buffers.is_empty() {
            return Err(GenerationError::NoAudioProduced(
                "No selected segment has audio".to_string(),
            ));
        }

        tracing::info!(segments = buffers.len(), "Exporting selected segments");
        Ok(encode_container(&concatenate(&buffers), PcmFormat::default())?)
    }

    async fn worker(
        &self,
        index: usize,
        credential: &Credential,
        voice: &VoiceConfig,
        queue: &Mutex<VecDeque<SegmentId>>,
        results: &Results,
        shared: bool,
    ) {
        let mut completed = 0usize;
        let mut failed = 0usize;

        while let Some(id) = claim(queue) {
            let Some(segment) = self.store.get(id) else {
                tracing::warn!(segment_id = %id, worker = index, "Claimed segment disappeared");
                continue;
            };

            match self.generator.generate(segment.text(), voice, credential).await {
                Ok(generated) => {
                    let audio = generated.audio.clone();
                    let published = self.store.update(id, |s| {
                        s.complete(generated.text, generated.audio);
                        Ok(())
                    });
                    if let Err(e) = published {
                        tracing::warn!(segment_id = %id, error = %e, "Could not publish result");
                    }
                    results.lock().insert(id, audio);
                    if shared {
                        self.quota.record_success().await;
                    }
                    self.status.lock().completed += 1;
                    completed += 1;

                    tracing::debug!(segment_id = %id, worker = index, "Segment completed");
                }
                Err(e) => {
                    if matches!(e, GenerationError::Codec(_)) {
                        tracing::error!(segment_id = %id, worker = index, error = %e, "Provider returned malformed audio");
                    } else {
                        tracing::warn!(segment_id = %id, worker = index, error = %e, "Segment failed");
                    }
                    let detail = e.to_string();
                    let recorded = self.store.update(id, |s| {
                        s.fail(detail);
                        Ok(())
                    });
                    if let Err(e) = recorded {
                        tracing::warn!(segment_id = %id, error = %e, "Could not record failure");
                    }
                    self.status.lock().failed += 1;
                    failed += 1;
                }
            }
        }

        tracing::debug!(worker = index, completed, failed, "Worker exited");
    }

    /// Mark one segment pending for a single-shot generation.
    ///
    /// Serialized with `begin` on the status lock: a segment is claimed by a
    /// batch or by a single-shot call, never both.
    pub fn claim_segment(&self, id: SegmentId) -> Result<Segment, GenerationError> {
        let status = self.status.lock();
        if status.state == BatchState::Running {
            return Err(GenerationError::BatchAlreadyRunning);
        }
        let segment = self.store.update(id, |s| {
            if s.status() == SegmentStatus::Pending {
                return Err(SegmentError::Busy(id));
            }
            s.mark_pending();
            Ok(())
        })?;
        Ok(segment)
    }

    fn begin(&self, workers: usize) -> Result<RunGuard<'_>, GenerationError> {
        let mut status = self.status.lock();
        if status.state == BatchState::Running {
            return Err(GenerationError::BatchAlreadyRunning);
        }
        // single-segment claims take the status lock too, so nothing turns
        // pending between this check and `Running`
        let snapshot = self.store.snapshot();
        if let Some(busy) = snapshot.iter().find(|s| s.status() == SegmentStatus::Pending) {
            return Err(GenerationError::SegmentBusy(busy.id()));
        }
        *status = BatchStatus {
            state: BatchState::Running,
            workers,
            started_at: Some(Utc::now()),
            ..BatchStatus::default()
        };
        Ok(RunGuard {
            status: &self.status,
            finished: false,
        })
    }
}

/// Atomic pop; the lock is released before the caller awaits anything.
fn claim(queue: &Mutex<VecDeque<SegmentId>>) -> Option<SegmentId> {
    queue.lock().pop_front()
}

/// Moves the batch out of `Running`; a run that never reaches `finish`
/// (pre-flight rejection, panic) is recorded as aborted.
struct RunGuard<'a> {
    status: &'a Mutex<BatchStatus>,
    finished: bool,
}

impl RunGuard<'_> {
    fn set_total(&mut self, total: usize) {
        self.status.lock().total = total;
    }

    fn finish(&mut self) -> BatchStatus {
        self.finished = true;
        let mut status = self.status.lock();
        status.state = BatchState::Completed;
        status.finished_at = Some(Utc::now());
        status.clone()
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut status = self.status.lock();
        status.state = BatchState::Aborted;
        status.finished_at = Some(Utc::now());
    }
}

/// Concatenate audio in segmentation order: fresh results first, otherwise
/// whatever the segment already had when the batch started.
fn reassemble(
    order: &[Segment],
    results: &HashMap<SegmentId, Arc<[u8]>>,
) -> Result<Vec<u8>, GenerationError> {
    let buffers: Vec<Arc<[u8]>> = order
        .iter()
        .filter_map(|s| results.get(&s.id()).cloned().or_else(|| s.audio().cloned()))
        .collect();

    if buffers.is_empty() {
        return Err(GenerationError::NoAudioProduced(
            "No segment produced audio".to_string(),
        ));
    }

    Ok(encode_container(&concatenate(&buffers), PcmFormat::default())?)
}
