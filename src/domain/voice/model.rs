use super::language::LanguageCode;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOICE: &str = "Puck";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Prebuilt provider voices with a short description of their character
pub const PREBUILT_VOICES: &[(&str, &str)] = &[
    ("Puck", "Male, energetic event host"),
    ("Charon", "Male, authoritative newsreader"),
    ("Fenrir", "Male, warm late-night storyteller"),
    ("Aoede", "Female, confident presenter"),
    ("Kore", "Female, calm customer support"),
    ("Zephyr", "Female, gentle children's stories"),
    ("Leda", "Female, refined premium ads"),
    ("Orus", "Male, confident speaker"),
    ("Achernar", "Female, soft counselling"),
    ("Achird", "Male, friendly tour guide"),
    ("Algenib", "Male, gravelly action trailer"),
    ("Algieba", "Male, smooth tech review"),
    ("Alnilam", "Male, firm fitness coach"),
    ("Autonoe", "Female, bright food review"),
    ("Callirrhoe", "Female, easy-going vlog"),
    ("Despina", "Female, fluent podcast host"),
    ("Enceladus", "Male, whispery horror/ASMR"),
    ("Erinome", "Female, clear call centre"),
    ("Gacrux", "Female, mature documentary"),
    ("Iapetus", "Male, articulate technical guide"),
    ("Laomedeia", "Female, lively cheerleader"),
    ("Pulcherrima", "Female, decisive executive"),
    ("Rasalgethi", "Male, erudite professor"),
    ("Sadachbia", "Male, vivid game commentary"),
    ("Sadaltager", "Male, knowledgeable finance"),
    ("Schedar", "Male, even public announcements"),
    ("Sulafat", "Female, warm healing radio"),
    ("Umbriel", "Male, easy-going companion"),
    ("Vindemiatrix", "Female, gentle meditation"),
    ("Zubenelgenubi", "Male, casual street interview"),
];

pub fn is_prebuilt_voice(name: &str) -> bool {
    PREBUILT_VOICES.iter().any(|(voice, _)| *voice == name)
}

/// Generation parameters, immutable for the duration of one call or batch
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    pub voice_name: String,
    pub style_instruction: String,
    pub temperature: f32,
    /// `None` means "auto": synthesize the text as written
    pub language: Option<LanguageCode>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice_name: DEFAULT_VOICE.to_string(),
            style_instruction: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            language: Some(LanguageCode::Vietnamese),
        }
    }
}

impl VoiceConfig {
    /// Prompt sent to the synthesis model: the style instruction, when
    /// present, is prefixed as `"{style}: {text}"`.
    pub fn synthesis_prompt(&self, text: &str) -> String {
        let style = self.style_instruction.trim();
        if style.is_empty() {
            text.to_string()
        } else {
            format!("{}: {}", style, text)
        }
    }

    /// Stable key for caching results produced with this configuration
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{:.3}|{}",
            self.voice_name,
            self.style_instruction.trim(),
            self.temperature,
            self.language.map(|l| l.as_str()).unwrap_or("auto")
        )
    }
}

/// Voice settings as supplied by API callers
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VoiceConfigRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TryFrom<VoiceConfigRequest> for VoiceConfig {
    type Error = String;

    fn try_from(request: VoiceConfigRequest) -> Result<Self, Self::Error> {
        let defaults = VoiceConfig::default();

        let voice_name = request.voice_name.unwrap_or(defaults.voice_name);
        if !is_prebuilt_voice(&voice_name) {
            return Err(format!("Unknown voice: {}", voice_name));
        }

        let temperature = request.temperature.unwrap_or(defaults.temperature);
        if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and {:.1}",
                MAX_TEMPERATURE
            ));
        }

        let language = match request.language.as_deref().map(str::trim) {
            None => defaults.language,
            Some("auto") | Some("") => None,
            Some(code) => Some(
                LanguageCode::parse(code).ok_or_else(|| format!("Invalid language: {}", code))?,
            ),
        };

        Ok(VoiceConfig {
            voice_name,
            style_instruction: request.style_instruction.unwrap_or_default(),
            temperature,
            language,
        })
    }
}
