use super::dto::CredentialsResponse;
use super::error::CredentialError;
use super::pool::{Credential, CredentialPool, CredentialSource};
use crate::domain::quota::QuotaService;
use crate::error::AppResult;
use crate::infrastructure::repositories::CredentialRepository;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Owns the active credential pool: either the caller's stored list or the
/// quota-gated shared credential.
pub struct CredentialService {
    repository: Arc<CredentialRepository>,
    quota: Arc<QuotaService>,
    shared_key: Option<Credential>,
    active: RwLock<Option<CredentialPool>>,
}

impl CredentialService {
    pub fn new(
        repository: Arc<CredentialRepository>,
        quota: Arc<QuotaService>,
        shared_key: Option<String>,
    ) -> Self {
        Self {
            repository,
            quota,
            shared_key: shared_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .map(Credential::new),
            active: RwLock::new(None),
        }
    }

    /// Startup reconciliation: migrate the legacy single credential, then
    /// activate the stored list, falling back to the shared credential.
    pub async fn bootstrap(&self) -> AppResult<()> {
        self.repository.migrate_legacy().await?;

        let keys = normalize_keys(self.repository.load().await?);
        let pool = CredentialPool::new(keys, CredentialSource::User).or_else(|| {
            self.shared_key
                .clone()
                .and_then(|key| CredentialPool::new(vec![key], CredentialSource::Shared))
        });

        match &pool {
            Some(pool) => tracing::info!(
                source = ?pool.source(),
                count = pool.len(),
                "Credential pool activated"
            ),
            None => tracing::warn!("No credentials configured; generation is disabled"),
        }

        *self.active.write() = pool;
        Ok(())
    }

    pub async fn set_user_credentials(
        &self,
        keys: Vec<String>,
    ) -> Result<CredentialPool, CredentialError> {
        let credentials = normalize_keys(keys);
        let raw: Vec<String> = credentials.iter().map(|c| c.expose().to_string()).collect();

        let pool = CredentialPool::new(credentials, CredentialSource::User).ok_or_else(|| {
            CredentialError::Invalid("At least one non-empty credential is required".to_string())
        })?;

        self.repository.save(&raw).await?;
        *self.active.write() = Some(pool.clone());

        tracing::info!(count = pool.len(), "User credentials stored");
        Ok(pool)
    }

    pub async fn use_shared_credential(&self) -> Result<CredentialPool, CredentialError> {
        let key = self
            .shared_key
            .clone()
            .ok_or(CredentialError::SharedUnavailable)?;
        self.quota.try_reserve(1).await?;

        let pool = CredentialPool::new(vec![key], CredentialSource::Shared)
            .ok_or(CredentialError::SharedUnavailable)?;
        *self.active.write() = Some(pool.clone());

        tracing::info!("Switched to shared credential");
        Ok(pool)
    }

    pub fn active_pool(&self) -> Result<CredentialPool, CredentialError> {
        self.active
            .read()
            .clone()
            .ok_or(CredentialError::NotConfigured)
    }

    pub fn shared_available(&self) -> bool {
        self.shared_key.is_some()
    }

    pub fn describe(&self) -> CredentialsResponse {
        let active = self.active.read();
        match active.as_ref() {
            Some(pool) => CredentialsResponse {
                source: Some(pool.source()),
                count: pool.len(),
                keys: pool.iter().map(Credential::masked).collect(),
                shared_available: self.shared_available(),
            },
            None => CredentialsResponse {
                source: None,
                count: 0,
                keys: Vec::new(),
                shared_available: self.shared_available(),
            },
        }
    }
}

/// Trim, drop empties and de-duplicate, keeping first occurrences in order.
fn normalize_keys(keys: Vec<String>) -> Vec<Credential> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .map(Credential::new)
        .collect()
}
