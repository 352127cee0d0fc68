use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{ConvertRequest, ConvertResponse, StatusResponse};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::store::{ConversionJob, JobStatus};
use crate::tts::SynthesisRequest;

/// Converts text to speech, persists the outcome as a job row, and on
/// success writes the audio under the configured directory so the returned
/// URL resolves through `GET /audio/{id}`.
///
/// Synthesis failures are not HTTP errors: the response is 200 with
/// `status: FAILED` so callers can tell "processed but conversion failed"
/// apart from "request malformed or system broken". Empty text is passed
/// through to the engine, which rejects it.
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    let synthesis = SynthesisRequest {
        text: request.text,
        language: request.language,
        voice_gender: request.voice_gender,
        speech_rate: request.speech_rate,
        pitch: request.pitch,
    };

    let job = match state.synthesizer.synthesize(&synthesis).await {
        Ok(audio) => {
            let id = Uuid::new_v4().to_string();
            let path = state.audio_dir.join(format!("{}.mp3", id));
            tokio::fs::write(&path, &audio).await?;
            tracing::info!("Conversion {} completed ({} bytes)", id, audio.len());
            ConversionJob {
                id,
                audio_file_path: Some(path.display().to_string()),
                status: JobStatus::Completed,
                message: "Text-to-speech conversion successful.".to_string(),
                created_at: Utc::now(),
            }
        }
        Err(e) => {
            let id = Uuid::new_v4().to_string();
            tracing::warn!("Conversion {} failed: {}", id, e);
            ConversionJob {
                id,
                audio_file_path: None,
                status: JobStatus::Failed,
                message: format!("An error occurred during conversion: {}", e),
                created_at: Utc::now(),
            }
        }
    };

    state.store.insert(&job).await?;

    let audio_file_url = match job.status {
        JobStatus::Completed => format!("{}/audio/{}", state.public_base_url, job.id),
        JobStatus::Failed => String::new(),
    };

    Ok(Json(ConvertResponse {
        audio_file_url,
        status: job.status,
        message: job.message,
    }))
}

/// Serves a stored audio file as an attachment download.
pub async fn retrieve_audio(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Response, AppError> {
    let audio = state.store.retrieve(&file_id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, audio.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", audio.file_name),
            ),
        ],
        audio.bytes,
    )
        .into_response())
}

/// Health check. Inspects no state; always operational while the process
/// serves requests.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Operational".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
