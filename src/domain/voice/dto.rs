use super::model::VoiceConfigRequest;
use serde::{Deserialize, Serialize};

/// Body shared by generation endpoints; every field is optional
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub voice: VoiceConfigRequest,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

/// Response for GET /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
    pub languages: Vec<LanguageInfo>,
}
