use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use http::{StatusCode, header};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use synthesis::{MERGED_FILE_NAME, Script, SubmitOptions, TaskState, TaskStatus};
use tokio_util::io::ReaderStream;

use crate::{error::ApiError, state::AppState};

/// Route prefix completed tasks advertise in their `audioUrl`
pub(crate) const DOWNLOAD_ROUTE: &str = "/api/tts/download";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tts/generate", post(generate))
        .route("/api/tts/progress/{task_id}", get(progress))
        .route("/api/tts/podcasts", get(podcasts))
        .route("/api/tts/podcasts/{task_id}", delete(delete_podcast))
        .route("/api/tts/download/{task_id}", get(download))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    script: Script,
    /// Per-request speaker-to-voice overrides
    #[serde(default)]
    voices: IndexMap<String, String>,
    /// Default voice override for unmapped speakers
    voice_id: Option<String>,
    speed: Option<f64>,
    emotion_mode: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    success: bool,
    message: String,
    task_id: String,
}

/// Accept a script and start its synthesis pipeline
async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let options = SubmitOptions {
        voices: request.voices,
        default_voice: request.voice_id,
        speed: request.speed,
        emotion_mode: request.emotion_mode,
    };

    let task_id = state.orchestrator.submit(request.script, options).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse {
            success: true,
            message: "TTS synthesis task submitted".to_string(),
            task_id,
        }),
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressResponse {
    success: bool,
    task_id: String,
    progress: u8,
    status: TaskStatus,
    /// Always present; null until the task completes
    audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_time_remaining: Option<u64>,
}

async fn progress(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let task = state
        .store
        .read(&task_id)
        .ok_or_else(|| ApiError::NotFound(format!("task '{task_id}' not found")))?;

    let estimated_time_remaining = estimate_remaining(&task);

    Ok(Json(ProgressResponse {
        success: true,
        task_id: task.task_id,
        progress: task.progress,
        status: task.status,
        audio_url: task.audio_url,
        error: task.error,
        estimated_time_remaining,
    }))
}

/// Linear projection in seconds from elapsed time and progress so far
///
/// Absent for terminal tasks and before the first progress write.
fn estimate_remaining(task: &TaskState) -> Option<u64> {
    if task.status.is_terminal() || task.progress == 0 {
        return None;
    }

    let elapsed_ms = jiff::Timestamp::now().as_millisecond() - task.started_at;
    if elapsed_ms <= 0 {
        return None;
    }

    let progress = i64::from(task.progress);
    let remaining_ms = elapsed_ms * (100 - progress) / progress;

    u64::try_from(remaining_ms / 1000).ok()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PodcastEntry {
    id: String,
    title: String,
    /// Estimated play length in seconds
    duration: u64,
    created_at: String,
    url: String,
    /// Merged artifact size in bytes
    size: u64,
}

#[derive(Serialize)]
struct PodcastsResponse {
    success: bool,
    podcasts: Vec<PodcastEntry>,
}

/// List completed tasks whose merged artifact is still on disk, newest first
async fn podcasts(State(state): State<AppState>) -> Json<PodcastsResponse> {
    let mut tasks = state.store.list();
    tasks.sort_by_key(|task| std::cmp::Reverse(task.started_at));

    let mut entries = Vec::new();

    for task in tasks {
        if task.status != TaskStatus::Completed {
            continue;
        }

        let artifact = state.store.task_dir(&task.task_id).join(MERGED_FILE_NAME);
        let Ok(metadata) = tokio::fs::metadata(&artifact).await else {
            tracing::warn!("Completed task {} has no merged audio, skipping", task.task_id);
            continue;
        };

        let created_at = task.created_at().to_string();

        entries.push(PodcastEntry {
            id: task.task_id,
            title: task.title,
            duration: task.duration_secs.unwrap_or_default(),
            created_at,
            url: task.audio_url.unwrap_or_default(),
            size: metadata.len(),
        });
    }

    Json(PodcastsResponse { success: true, podcasts: entries })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    success: bool,
    message: String,
    podcast_id: String,
}

/// Delete a terminal task and its working directory
///
/// Deleting a task that is still processing or merging is rejected, so an
/// in-flight pipeline can never write into a removed directory.
async fn delete_podcast(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let task = state
        .store
        .read(&task_id)
        .ok_or_else(|| ApiError::NotFound(format!("task '{task_id}' not found")))?;

    if !task.status.is_terminal() {
        return Err(ApiError::Conflict(format!("task '{task_id}' is still {}", task.status)));
    }

    match state.store.remove(&task_id).await {
        Ok(Some(_)) => Ok(Json(DeleteResponse {
            success: true,
            message: "Podcast deleted".to_string(),
            podcast_id: task_id,
        })),
        Ok(None) => Err(ApiError::NotFound(format!("task '{task_id}' not found"))),
        Err(e) => {
            tracing::error!("Failed to delete task {task_id}: {e}");
            Err(ApiError::Internal("failed to delete podcast".to_string()))
        }
    }
}

/// Stream the merged audio of a completed task
async fn download(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Response, ApiError> {
    let task = state
        .store
        .read(&task_id)
        .ok_or_else(|| ApiError::NotFound(format!("task '{task_id}' not found")))?;

    if task.status != TaskStatus::Completed {
        return Err(ApiError::NotFound(format!("task '{task_id}' has no merged audio")));
    }

    let path = state.store.task_dir(&task_id).join(MERGED_FILE_NAME);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::NotFound(format!("task '{task_id}' has no merged audio")))?;

    let len = file
        .metadata()
        .await
        .map_err(|e| {
            tracing::error!("Failed to stat merged audio for task {task_id}: {e}");
            ApiError::Internal("failed to read merged audio".to_string())
        })?
        .len();

    let headers = [
        (header::CONTENT_TYPE, "audio/mpeg".to_string()),
        (header::CONTENT_LENGTH, len.to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{task_id}.mp3\"")),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}
