use super::pool::CredentialSource;
use serde::{Deserialize, Serialize};

/// Request for PUT /api/credentials
#[derive(Debug, Serialize, Deserialize)]
pub struct SetCredentialsRequest {
    pub keys: Vec<String>,
}

/// Response for the credential endpoints; keys are masked
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CredentialSource>,
    pub count: usize,
    pub keys: Vec<String>,
    pub shared_available: bool,
}
