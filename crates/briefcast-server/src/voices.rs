use axum::{Json, Router, extract::State, routing::get};
use indexmap::IndexMap;
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/voices", get(voices))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoicesResponse {
    success: bool,
    default_voice: String,
    /// Configured speaker-to-voice mappings
    speakers: IndexMap<String, String>,
    voices: Vec<VoiceDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceDto {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// Read-only view of the configured voice catalog
async fn voices(State(state): State<AppState>) -> Json<VoicesResponse> {
    let catalog = state
        .voices
        .catalog
        .iter()
        .map(|entry| VoiceDto {
            id: entry.id.clone(),
            name: entry.name.clone(),
            description: entry.description.clone(),
        })
        .collect();

    Json(VoicesResponse {
        success: true,
        default_voice: state.voices.default_voice.clone(),
        speakers: state.voices.speakers.clone(),
        voices: catalog,
    })
}
