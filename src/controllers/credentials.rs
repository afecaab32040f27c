use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::credential::dto::{CredentialsResponse, SetCredentialsRequest};
use crate::domain::credential::{CredentialService, CredentialSource};
use crate::domain::quota::dto::UsageResponse;
use crate::domain::quota::QuotaService;
use crate::error::AppResult;

pub struct CredentialController {
    credential_service: Arc<CredentialService>,
    quota_service: Arc<QuotaService>,
}

impl CredentialController {
    pub fn new(credential_service: Arc<CredentialService>, quota_service: Arc<QuotaService>) -> Self {
        Self {
            credential_service,
            quota_service,
        }
    }

    /// GET /api/credentials - Masked view of the active pool
    pub async fn get_credentials(
        State(controller): State<Arc<CredentialController>>,
    ) -> AppResult<Json<CredentialsResponse>> {
        Ok(Json(controller.credential_service.describe()))
    }

    /// PUT /api/credentials - Replace the stored credential list
    pub async fn set_credentials(
        State(controller): State<Arc<CredentialController>>,
        Json(request): Json<SetCredentialsRequest>,
    ) -> AppResult<Json<CredentialsResponse>> {
        controller
            .credential_service
            .set_user_credentials(request.keys)
            .await?;
        Ok(Json(controller.credential_service.describe()))
    }

    /// POST /api/credentials/shared - Switch to the quota-gated shared credential
    pub async fn use_shared(
        State(controller): State<Arc<CredentialController>>,
    ) -> AppResult<Json<CredentialsResponse>> {
        controller.credential_service.use_shared_credential().await?;
        Ok(Json(controller.credential_service.describe()))
    }

    /// GET /api/usage - Shared quota usage
    pub async fn get_usage(
        State(controller): State<Arc<CredentialController>>,
    ) -> AppResult<Json<UsageResponse>> {
        let source = match controller.credential_service.active_pool() {
            Ok(pool) if pool.source() == CredentialSource::Shared => "shared",
            Ok(_) => "user",
            Err(_) => "none",
        };
        Ok(Json(controller.quota_service.usage(source).await))
    }
}
