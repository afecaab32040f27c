use super::settings_repository::SettingsRepository;
use crate::error::AppResult;
use std::sync::Arc;

pub const USER_KEYS_KEY: &str = "voice_studio_user_keys";
pub const LEGACY_USER_KEY_KEY: &str = "voice_studio_user_key";

/// Persists the caller-supplied credential list as a JSON array of strings.
pub struct CredentialRepository {
    settings: Arc<dyn SettingsRepository>,
}

impl CredentialRepository {
    pub fn new(settings: Arc<dyn SettingsRepository>) -> Self {
        Self { settings }
    }

    /// One-time reconciliation of the legacy single-credential key: when no
    /// list is stored yet, the legacy value becomes a one-element list and
    /// the legacy key is removed. Returns whether a migration happened.
    pub async fn migrate_legacy(&self) -> AppResult<bool> {
        if self.settings.get(USER_KEYS_KEY).await?.is_some() {
            return Ok(false);
        }

        let Some(legacy) = self.settings.get(LEGACY_USER_KEY_KEY).await? else {
            return Ok(false);
        };

        let legacy = legacy.trim().to_string();
        if !legacy.is_empty() {
            self.save(&[legacy]).await?;
        }
        self.settings.delete(LEGACY_USER_KEY_KEY).await?;

        tracing::info!("Migrated legacy single credential into credential list");
        Ok(true)
    }

    /// Stored credentials; a malformed or empty list reads as none.
    pub async fn load(&self) -> AppResult<Vec<String>> {
        let Some(raw) = self.settings.get(USER_KEYS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(keys) => Ok(keys),
            Err(e) => {
                tracing::warn!(error = %e, "Stored credential list is malformed, ignoring it");
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(&self, keys: &[String]) -> AppResult<()> {
        let raw = serde_json::to_string(keys)
            .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
        self.settings.set(USER_KEYS_KEY, &raw).await
    }
}
