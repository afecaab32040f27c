pub mod gemini;
pub mod speech_provider;

pub use gemini::{GeminiConfig, GeminiSpeechProvider};
pub use speech_provider::{ProviderError, ProviderErrorKind, SpeechProvider, SynthesisOutput};
