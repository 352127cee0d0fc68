use async_trait::async_trait;

use super::{SynthesisError, SynthesisRequest, Synthesizer};

const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// The endpoint rejects long inputs, so text is synthesized in chunks of at
/// most this many characters and the MP3 segments are concatenated.
const MAX_CHUNK_CHARS: usize = 200;

/// Language codes the Translate TTS endpoint speaks. Requests for anything
/// else fail before a network round trip.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "ar", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en",
    "eo", "es", "et", "fi", "fr", "gu", "hi", "hr", "hu", "id", "is", "it",
    "iw", "ja", "jw", "km", "kn", "ko", "la", "lv", "ml", "mr", "ms", "my",
    "ne", "nl", "no", "pl", "pt", "ro", "ru", "si", "sk", "sq", "sr", "su",
    "sv", "sw", "ta", "te", "th", "tl", "tr", "uk", "ur", "vi", "zh",
    "zh-CN", "zh-TW",
];

/// Client for the Google Translate text-to-speech endpoint.
///
/// Produces MPEG audio. The endpoint exposes no voice-gender, rate or pitch
/// controls; those fields of [`SynthesisRequest`] are ignored here.
pub struct GoogleTranslateTts {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslateTts {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    async fn fetch_chunk(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SynthesisError::Engine(format!(
                "engine returned HTTP {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("audio/") {
            return Err(SynthesisError::Engine(format!(
                "engine returned non-audio content ({})",
                content_type
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl Default for GoogleTranslateTts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Synthesizer for GoogleTranslateTts {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        if request.text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        if !is_supported_language(&request.language) {
            return Err(SynthesisError::UnsupportedLanguage(request.language.clone()));
        }

        let chunks = split_text(&request.text, MAX_CHUNK_CHARS);
        tracing::debug!(
            "Synthesizing {} chars in {} chunk(s), language {}",
            request.text.chars().count(),
            chunks.len(),
            request.language
        );

        let mut audio = Vec::new();
        for chunk in &chunks {
            let segment = self.fetch_chunk(chunk, &request.language).await?;
            audio.extend_from_slice(&segment);
        }

        Ok(audio)
    }
}

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|l| *l == code)
}

/// Splits `text` into whitespace-trimmed chunks of at most `max_chars`
/// characters, breaking at word boundaries where possible. Words longer
/// than `max_chars` are split mid-word.
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        // A single word can exceed the chunk size; hard-split it.
        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut piece = String::new();
            let mut piece_len = 0;
            for ch in word.chars() {
                if piece_len == max_chars {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
                piece.push(ch);
                piece_len += 1;
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
