use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response for GET /api/usage
#[derive(Debug, Serialize, Deserialize)]
pub struct UsageResponse {
    /// `shared` while the quota-gated system credential is active
    pub source: String,
    pub usage: UsageStats,
    pub limits: UsageLimits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageStats {
    pub generations: u32,
    pub remaining: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageLimits {
    pub generations: u32,
    pub window_minutes: i64,
}
