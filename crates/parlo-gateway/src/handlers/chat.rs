// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat endpoints: POST /api/chat/message and POST /api/chat/voice.

use axum::extract::{Multipart, State};
use axum::Json;
use parlo_core::types::SynthesisRequest;
use parlo_core::ParloError;
use parlo_storage::models::TurnRecord;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::ApiState;
use crate::session::resolve_or_create_session;

/// Transcript recorded for voice messages until speech-to-text lands.
pub const TRANSCRIPTION_PLACEHOLDER: &str = "[Voice message - transcription pending]";

/// Session title used when a voice message opens a new session.
const VOICE_SESSION_TITLE: &str = "Voice conversation";

/// Request body for POST /api/chat/message.
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    /// Message text.
    pub message: String,
    /// Optional session id to continue an existing session.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Optional caller identifier.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Language of the spoken reply.
    #[serde(default = "default_language")]
    pub language: String,
    /// Accent selector; falls back to the configured default voice.
    #[serde(default)]
    pub voice: Option<String>,
    /// Augment the prompt with similar prior turns.
    #[serde(default = "default_use_rag")]
    pub use_rag: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_use_rag() -> bool {
    true
}

/// Response body for both chat endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub session_id: String,
    pub user_message: String,
    pub ai_response: String,
    pub ai_audio_url: Option<String>,
    pub conversation_id: String,
    pub metadata: serde_json::Value,
}

/// Spoken replies slow down for Vietnamese learners; other languages use the
/// configured default speed.
fn chat_speed(language: &str, default: f32) -> f32 {
    if language == "vi" {
        default.min(0.9)
    } else {
        default
    }
}

/// POST /api/chat/message
///
/// Resolves (or creates) the session, obtains the AI reply, renders it to
/// speech, and persists the exchange.
pub async fn post_chat_message(
    State(state): State<ApiState>,
    Json(body): Json<ChatMessageRequest>,
) -> Result<Json<ChatTurnResponse>, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ParloError::Validation("Message cannot be empty".into()).into());
    }

    let session = resolve_or_create_session(
        &state.store,
        body.session_id.as_deref(),
        body.user_id.clone(),
        &body.message,
    )
    .await?;

    let response = run_chat_turn(
        &state,
        &session.id,
        body.user_id,
        body.message,
        None,
        &body.language,
        body.voice,
        body.use_rag,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/chat/voice (multipart)
///
/// Stores the uploaded audio under `user/`, substitutes the transcription
/// placeholder for the message text, and runs the same chat flow.
pub async fn post_chat_voice(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<ChatTurnResponse>, ApiError> {
    let mut audio_bytes: Option<Vec<u8>> = None;
    let mut session_id: Option<String> = None;
    let mut user_id: Option<String> = None;
    let mut language = default_language();
    let mut voice: Option<String> = None;
    let mut use_rag = default_use_rag();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ParloError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" | "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ParloError::Validation(format!("Invalid audio upload: {e}")))?;
                audio_bytes = Some(bytes.to_vec());
            }
            "session_id" => session_id = field.text().await.ok(),
            "user_id" => user_id = field.text().await.ok(),
            "language" => {
                if let Ok(text) = field.text().await {
                    language = text;
                }
            }
            "voice" => voice = field.text().await.ok(),
            "use_rag" => {
                if let Some(parsed) = field.text().await.ok().and_then(|t| t.parse().ok()) {
                    use_rag = parsed;
                }
            }
            _ => {}
        }
    }

    let audio =
        audio_bytes.ok_or_else(|| ParloError::Validation("No audio file provided".into()))?;

    let upload_name = format!("{}.wav", Uuid::new_v4());
    state.audio.save_user(&upload_name, &audio).await?;
    let user_audio_url = format!("/audio/user/{upload_name}");
    info!(filename = %upload_name, size = audio.len(), "voice upload stored");

    let session = resolve_or_create_session(
        &state.store,
        session_id.as_deref(),
        user_id.clone(),
        VOICE_SESSION_TITLE,
    )
    .await?;

    let response = run_chat_turn(
        &state,
        &session.id,
        user_id,
        TRANSCRIPTION_PLACEHOLDER.to_string(),
        Some(user_audio_url),
        &language,
        voice,
        use_rag,
    )
    .await?;
    Ok(Json(response))
}

/// Shared tail of both chat endpoints: completion, synthesis, persistence,
/// response assembly.
#[allow(clippy::too_many_arguments)]
async fn run_chat_turn(
    state: &ApiState,
    session_id: &str,
    user_id: Option<String>,
    user_message: String,
    user_audio_url: Option<String>,
    language: &str,
    voice: Option<String>,
    use_rag: bool,
) -> Result<ChatTurnResponse, ApiError> {
    let outcome = state
        .orchestrator
        .respond(&user_message, Some(session_id), use_rag)
        .await?;

    let voice = voice.unwrap_or_else(|| state.default_voice.clone());
    let artifact = state
        .synthesizer
        .synthesize(SynthesisRequest {
            text: outcome.response.clone(),
            voice: voice.clone(),
            speed: chat_speed(language, state.default_speed),
            language: language.to_string(),
        })
        .await?;

    let turn_metadata = serde_json::json!({
        "language": language,
        "voice": voice,
        "model": outcome.model,
        "context_used": outcome.context_used,
        "audio_format": artifact.format,
    });
    let turn = TurnRecord::new(
        session_id.to_string(),
        user_id,
        user_message.clone(),
        outcome.response.clone(),
        user_audio_url.clone(),
        Some(artifact.audio_url.clone()),
        Some(turn_metadata.to_string()),
    );
    state.store.insert_turn(&turn).await?;

    let mut metadata = serde_json::json!({
        "voice": voice,
        "language": language,
        "audio_file_size": artifact.file_size,
        "model": outcome.model,
    });
    if let Some(url) = &user_audio_url {
        metadata["user_audio_url"] = serde_json::Value::String(url.clone());
    }

    Ok(ChatTurnResponse {
        session_id: session_id.to_string(),
        user_message,
        ai_response: outcome.response,
        ai_audio_url: Some(artifact.audio_url),
        conversation_id: turn.id,
        metadata,
    })
}
