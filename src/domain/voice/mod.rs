pub mod dto;
pub mod language;
pub mod model;

pub use language::{LanguageCode, LanguageDetection};
pub use model::{is_prebuilt_voice, VoiceConfig, VoiceConfigRequest, PREBUILT_VOICES};
