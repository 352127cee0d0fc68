pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::store::JobStatus;

/// Body of `POST /convert`.
///
/// `voice_gender`, `speech_rate` and `pitch` are accepted for interface
/// compatibility only; the backing engine ignores them, so they have no
/// effect on the generated audio.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_voice_gender")]
    pub voice_gender: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_voice_gender() -> String {
    "female".to_string()
}

fn default_speech_rate() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

/// Body of a `POST /convert` response. Synthesis failures are reported here
/// with `status: FAILED` and an empty URL, not as HTTP errors.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub audio_file_url: String,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
}
