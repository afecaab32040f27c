use super::dto::{UsageLimits, UsageResponse, UsageStats};
use super::tracker::{QuotaExceeded, QuotaTracker, UsageWindow};
use crate::error::AppResult;
use crate::infrastructure::repositories::UsageRepository;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared-credential quota backed by the persisted usage window.
///
/// Every reset and every confirmed increment is written back; a failed write
/// is logged and never fails the generation that caused it.
///
/// Tracker updates that get persisted happen under `writes`, held across the
/// save, so stored windows land in the order they were produced.
pub struct QuotaService {
    tracker: QuotaTracker,
    repository: Arc<UsageRepository>,
    writes: Mutex<()>,
}

impl QuotaService {
    /// Restore the stored window and apply the staleness check once.
    pub async fn load(
        repository: Arc<UsageRepository>,
        max_usage: u32,
        window: Duration,
    ) -> AppResult<Self> {
        let stored = repository.load_window().await?;
        let service = Self {
            tracker: QuotaTracker::new(max_usage, window, stored),
            repository,
            writes: Mutex::new(()),
        };

        let (current, reset) = service.tracker.refresh(Utc::now());
        if reset {
            service.repository.save_window(&current).await?;
        }

        tracing::info!(
            count = current.count,
            max_usage = max_usage,
            window_minutes = window.num_minutes(),
            "Shared usage window loaded"
        );

        Ok(service)
    }

    pub async fn remaining(&self) -> u32 {
        let now = Utc::now();
        self.refresh().await;
        self.tracker.remaining(now)
    }

    /// Admission check for `n` generations on the shared credential.
    pub async fn try_reserve(&self, n: u32) -> Result<(), QuotaExceeded> {
        self.refresh().await;
        self.tracker.try_reserve(Utc::now(), n)
    }

    /// Charge one confirmed shared-credential success.
    pub async fn record_success(&self) -> UsageWindow {
        let _writes = self.writes.lock().await;
        let window = self.tracker.record_success(Utc::now());
        self.persist(&window).await;

        tracing::debug!(
            count = window.count,
            max_usage = self.tracker.max_usage(),
            "Shared usage incremented"
        );
        window
    }

    pub async fn usage(&self, source: &str) -> UsageResponse {
        let now = Utc::now();
        let window = self.refresh().await;

        UsageResponse {
            source: source.to_string(),
            usage: UsageStats {
                generations: window.count,
                remaining: self.tracker.max_usage().saturating_sub(window.count),
            },
            limits: UsageLimits {
                generations: self.tracker.max_usage(),
                window_minutes: self.tracker.window_duration().num_minutes(),
            },
            window_started_at: window.window_start,
            resets_at: self.tracker.resets_at(now),
        }
    }

    async fn refresh(&self) -> UsageWindow {
        let _writes = self.writes.lock().await;
        let (window, reset) = self.tracker.refresh(Utc::now());
        if reset {
            self.persist(&window).await;
        }
        window
    }

    async fn persist(&self, window: &UsageWindow) {
        if let Err(e) = self.repository.save_window(window).await {
            tracing::warn!(error = %e, "Failed to persist shared usage window");
        }
    }
}
