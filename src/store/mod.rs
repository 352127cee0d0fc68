use std::io::ErrorKind;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AppError;

/// Content type of everything the synthesizer produces.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Outcome of a conversion attempt. Stored as text in the job row and
/// serialized verbatim into API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "COMPLETED" => Some(JobStatus::Completed),
            "FAILED" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

/// One text-to-speech conversion attempt and its outcome.
///
/// Rows are written once and never mutated: a completed job carries the path
/// of its audio file, a failed job carries no path and a diagnostic message.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub id: String,
    pub audio_file_path: Option<String>,
    pub status: JobStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Audio bytes plus the metadata the retrieval endpoint serves alongside.
#[derive(Debug)]
pub struct StoredAudio {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

/// SQLite-backed store of conversion jobs.
///
/// The pool is created once at startup and shared across requests; audio
/// bytes live on the filesystem at the path each job row records.
#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    /// Open (or create) the database at `url` and run pending migrations.
    ///
    /// `url` is a sqlx-compatible SQLite URL, e.g. `sqlite://tts.db?mode=rwc`.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn insert(&self, job: &ConversionJob) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO conversion_jobs (id, audio_file_path, status, message, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&job.id)
        .bind(&job.audio_file_path)
        .bind(job.status.as_str())
        .bind(&job.message)
        .bind(job.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<ConversionJob>, sqlx::Error> {
        let row: Option<(String, Option<String>, String, String, String)> = sqlx::query_as(
            "SELECT id, audio_file_path, status, message, created_at \
             FROM conversion_jobs WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, audio_file_path, status, message, created_at)| {
            let status = JobStatus::parse(&status).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown job status '{}'", status).into())
            })?;
            let created_at = created_at
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now());
            Ok(ConversionJob {
                id,
                audio_file_path,
                status,
                message,
                created_at,
            })
        })
        .transpose()
    }

    /// Looks up a job row and reads its audio file from disk.
    ///
    /// The two failure modes are distinct: an unknown identifier (or a row
    /// with no recorded path, i.e. a failed conversion) is `JobNotFound`,
    /// while a recorded path whose file has gone missing from storage is
    /// `AudioFileMissing`.
    pub async fn retrieve(&self, file_id: &str) -> Result<StoredAudio, AppError> {
        let job = self.get(file_id).await?;

        let path = match job.and_then(|j| j.audio_file_path) {
            Some(path) if !path.is_empty() => path,
            _ => return Err(AppError::JobNotFound(file_id.to_string())),
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::AudioFileMissing(file_id.to_string()));
            }
            Err(e) => return Err(AppError::IoError(e)),
        };

        Ok(StoredAudio {
            bytes,
            file_name: format!("{}.mp3", file_id),
            content_type: AUDIO_CONTENT_TYPE,
        })
    }
}
