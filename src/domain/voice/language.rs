use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes offered as synthesis targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "vi")]
    Vietnamese,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "ru")]
    Russian,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 9] = [
        LanguageCode::Vietnamese,
        LanguageCode::English,
        LanguageCode::Japanese,
        LanguageCode::Korean,
        LanguageCode::Chinese,
        LanguageCode::French,
        LanguageCode::Spanish,
        LanguageCode::German,
        LanguageCode::Russian,
    ];

    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Vietnamese => "vi",
            LanguageCode::English => "en",
            LanguageCode::Japanese => "ja",
            LanguageCode::Korean => "ko",
            LanguageCode::Chinese => "zh",
            LanguageCode::French => "fr",
            LanguageCode::Spanish => "es",
            LanguageCode::German => "de",
            LanguageCode::Russian => "ru",
        }
    }

    /// English display name, used in translation prompts
    pub fn name(&self) -> &'static str {
        match self {
            LanguageCode::Vietnamese => "Vietnamese",
            LanguageCode::English => "English",
            LanguageCode::Japanese => "Japanese",
            LanguageCode::Korean => "Korean",
            LanguageCode::Chinese => "Chinese",
            LanguageCode::French => "French",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::German => "German",
            LanguageCode::Russian => "Russian",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(code.trim()))
    }

    /// Convert lingua Language to LanguageCode
    pub fn from_lingua(language: Language) -> Option<Self> {
        match language {
            Language::Vietnamese => Some(LanguageCode::Vietnamese),
            Language::English => Some(LanguageCode::English),
            Language::Japanese => Some(LanguageCode::Japanese),
            Language::Korean => Some(LanguageCode::Korean),
            Language::Chinese => Some(LanguageCode::Chinese),
            Language::French => Some(LanguageCode::French),
            Language::Spanish => Some(LanguageCode::Spanish),
            Language::German => Some(LanguageCode::German),
            Language::Russian => Some(LanguageCode::Russian),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Local language detection over the target languages, used to decide
/// whether a segment needs a translation round-trip.
pub struct LanguageDetection {
    detector: LanguageDetector,
}

impl Default for LanguageDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetection {
    pub fn new() -> Self {
        // Built from the languages enabled in Cargo.toml
        let detector = LanguageDetectorBuilder::from_all_languages().build();
        Self { detector }
    }

    pub fn detect(&self, text: &str) -> Option<LanguageCode> {
        self.detector
            .detect_language_of(text)
            .and_then(LanguageCode::from_lingua)
    }
}
