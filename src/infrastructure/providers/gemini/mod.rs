mod messages;
mod provider;

pub use provider::{
    GeminiConfig, GeminiSpeechProvider, DEFAULT_BASE_URL, DEFAULT_TRANSLATION_MODEL,
    DEFAULT_TTS_MODEL,
};
