pub mod gtts;

use async_trait::async_trait;

pub use gtts::GoogleTranslateTts;

/// One synthesis attempt as handed to the engine.
///
/// `voice_gender`, `speech_rate` and `pitch` are accepted for interface
/// compatibility but the backing engine offers no control over them; they
/// have no effect on the generated audio.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub language: String,
    pub voice_gender: String,
    pub speech_rate: f32,
    pub pitch: f32,
}

#[derive(thiserror::Error, Debug)]
pub enum SynthesisError {
    #[error("text must not be empty")]
    EmptyText,

    #[error("unsupported language code: '{0}'")]
    UnsupportedLanguage(String),

    #[error("TTS engine request failed: {0}")]
    Transport(String),

    #[error("TTS engine error: {0}")]
    Engine(String),
}

/// A speech engine producing MP3 audio from text.
///
/// Implementations must convert every internal failure into a
/// [`SynthesisError`]; nothing panics across this boundary.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError>;
}
