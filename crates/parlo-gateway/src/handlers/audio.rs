// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audio endpoints: synthesis plus file serving and deletion.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use parlo_core::types::{SynthesisArtifact, SynthesisRequest};
use parlo_core::ParloError;
use parlo_speech::audio_store::media_type;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::ApiState;

/// Request body for POST /api/audio/synthesize.
#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    /// Text to render.
    pub text: String,
    /// Accent selector; falls back to the configured default voice.
    #[serde(default)]
    pub voice: Option<String>,
    /// Playback speed multiplier; falls back to the configured default.
    #[serde(default)]
    pub speed: Option<f32>,
    /// ISO 639-1 language code.
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

/// Response body for POST /api/audio/synthesize.
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub artifact: SynthesisArtifact,
}

/// Vietnamese output defaults to the slowed learner speed unless the caller
/// picked one explicitly. An operator who configured an even slower default
/// keeps it.
fn effective_speed(language: &str, requested: Option<f32>, default: f32) -> f32 {
    match requested {
        Some(speed) => speed,
        None if language == "vi" => default.min(0.9),
        None => default,
    }
}

/// POST /api/audio/synthesize
pub async fn post_synthesize(
    State(state): State<ApiState>,
    Json(body): Json<SynthesizeRequest>,
) -> Result<(StatusCode, Json<SynthesizeResponse>), ApiError> {
    let request = SynthesisRequest {
        speed: effective_speed(&body.language, body.speed, state.default_speed),
        text: body.text,
        voice: body.voice.unwrap_or_else(|| state.default_voice.clone()),
        language: body.language,
    };

    let artifact = state.synthesizer.synthesize(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(SynthesizeResponse {
            success: true,
            message: "Audio synthesized successfully".into(),
            artifact,
        }),
    ))
}

/// GET /api/audio/{filename} and GET /audio/{filename}
pub async fn get_audio(
    State(state): State<ApiState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state
        .audio
        .resolve(&filename)
        .await?
        .ok_or_else(|| ParloError::NotFound("Audio file not found".into()))?;
    serve_file(&filename, &path).await
}

/// GET /audio/user/{filename}
pub async fn get_user_audio(
    State(state): State<ApiState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let path = state
        .audio
        .resolve_user(&filename)
        .await?
        .ok_or_else(|| ParloError::NotFound("Audio file not found".into()))?;
    serve_file(&filename, &path).await
}

/// DELETE /api/audio/{filename}
pub async fn delete_audio(
    State(state): State<ApiState>,
    Path(filename): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.audio.delete(&filename).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ParloError::NotFound("Audio file not found".into()).into())
    }
}

async fn serve_file(filename: &str, path: &std::path::Path) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ParloError::Internal(format!("failed to read audio file: {e}")))?;
    Ok(([(header::CONTENT_TYPE, media_type(filename))], bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesize_request_defaults() {
        let req: SynthesizeRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(req.text, "hello");
        assert!(req.voice.is_none());
        assert!(req.speed.is_none());
        assert_eq!(req.language, "en");
    }

    #[test]
    fn vietnamese_default_speed_is_slowed() {
        assert!((effective_speed("vi", None, 1.0) - 0.9).abs() < f32::EPSILON);
        // An explicit speed is honored.
        assert!((effective_speed("vi", Some(1.5), 1.0) - 1.5).abs() < f32::EPSILON);
        assert!((effective_speed("vi", Some(0.5), 1.0) - 0.5).abs() < f32::EPSILON);
        assert!((effective_speed("en", None, 1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn configured_default_speed_applies_when_unset() {
        assert!((effective_speed("en", None, 0.5) - 0.5).abs() < f32::EPSILON);
        // A configured default slower than the learner speed wins for vi.
        assert!((effective_speed("vi", None, 0.5) - 0.5).abs() < f32::EPSILON);
        assert!((effective_speed("vi", None, 1.2) - 0.9).abs() < f32::EPSILON);
        // Explicit speeds still override the configured default.
        assert!((effective_speed("en", Some(1.5), 0.5) - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn synthesize_response_flattens_artifact() {
        let resp = SynthesizeResponse {
            success: true,
            message: "Audio synthesized successfully".into(),
            artifact: SynthesisArtifact {
                audio_url: "/audio/a.mp3".into(),
                filename: "a.mp3".into(),
                format: "mp3".into(),
                voice: "com".into(),
                speed: 0.9,
                file_size: 2048,
                text_length: 11,
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["audio_url"], "/audio/a.mp3");
        assert_eq!(json["file_size"], 2048);
    }
}
