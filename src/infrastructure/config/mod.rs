use serde::Deserialize;
use std::env;

use crate::domain::quota::{DEFAULT_MAX_USAGE, DEFAULT_WINDOW_MINUTES};
use crate::domain::segment::DEFAULT_MAX_WORDS;
use crate::infrastructure::providers::gemini::{
    DEFAULT_BASE_URL, DEFAULT_TRANSLATION_MODEL, DEFAULT_TTS_MODEL,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    /// Settings are kept in memory when unset
    pub database_url: Option<String>,
    // Speech provider
    pub gemini_api_base_url: String,
    pub tts_model: String,
    pub translation_model: String,
    pub provider_timeout_secs: u64,
    /// Shared credential offered under the free usage quota
    pub system_api_key: Option<String>,
    pub free_usage_limit: u32,
    pub free_usage_window_minutes: i64,
    pub segment_max_words: usize,
    pub preview_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            database_url: optional_var("DATABASE_URL"),
            gemini_api_base_url: env::var("GEMINI_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            tts_model: env::var("TTS_MODEL").unwrap_or_else(|_| DEFAULT_TTS_MODEL.to_string()),
            translation_model: env::var("TRANSLATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATION_MODEL.to_string()),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()?,
            system_api_key: optional_var("SYSTEM_API_KEY"),
            free_usage_limit: env::var("FREE_USAGE_LIMIT")
                .unwrap_or_else(|_| DEFAULT_MAX_USAGE.to_string())
                .parse()?,
            free_usage_window_minutes: env::var("FREE_USAGE_WINDOW_MINUTES")
                .unwrap_or_else(|_| DEFAULT_WINDOW_MINUTES.to_string())
                .parse()?,
            segment_max_words: env::var("SEGMENT_MAX_WORDS")
                .unwrap_or_else(|_| DEFAULT_MAX_WORDS.to_string())
                .parse()?,
            preview_cache_enabled: env::var("PREVIEW_CACHE_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        };

        if config.segment_max_words == 0 {
            return Err("SEGMENT_MAX_WORDS must be at least 1".into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Unset and blank both read as `None`
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
