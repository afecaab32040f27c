use super::settings_repository::SettingsRepository;
use crate::domain::quota::UsageWindow;
use crate::error::AppResult;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub const USAGE_COUNT_KEY: &str = "voice_studio_usage_count";
pub const USAGE_START_TIME_KEY: &str = "voice_studio_usage_start_time";

/// Persists the shared-credential usage window as `(count, start epoch ms)`,
/// with `0` standing for "no window open".
pub struct UsageRepository {
    settings: Arc<dyn SettingsRepository>,
}

impl UsageRepository {
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self { settings }
    }

    /// Load the stored window. Missing or unparsable values read as zero.
    pub async fn load_window(&self) -> AppResult<UsageWindow> {
        let count = self
            .settings
            .get(USAGE_COUNT_KEY)
            .await?
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0);
        let start_ms = self
            .settings
            .get(USAGE_START_TIME_KEY)
            .await?
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        Ok(UsageWindow::new(count, millis_to_datetime(start_ms)))
    }

    pub async fn save_window(&self, window: &UsageWindow) -> AppResult<()> {
        let start_ms = window
            .window_start
            .map(|start| start.timestamp_millis())
            .unwrap_or(0);

        self.settings
            .set(USAGE_COUNT_KEY, &window.count.to_string())
            .await?;
        self.settings
            .set(USAGE_START_TIME_KEY, &start_ms.to_string())
            .await?;

        Ok(())
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    if millis <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(millis).single()
}
