// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History endpoints: session and conversation CRUD.
//!
//! Unlike the chat endpoints, these apply the strict identifier taxonomy:
//! malformed id 400, well-formed-but-absent id 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parlo_core::types::ensure_uuid;
use parlo_core::ParloError;
use parlo_storage::models::{SessionRecord, TurnRecord};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::ApiState;

/// Longest preview excerpt of a session's first message.
const MAX_PREVIEW_CHARS: usize = 100;

/// Request body for POST /api/history/sessions.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Query parameters for GET /api/history/sessions.
#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// One session in a listing, with a preview of its first message.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(flatten)]
    pub session: SessionRecord,
    pub preview_message: Option<String>,
}

/// Response body for GET /api/history/sessions.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
}

/// Response body for GET /api/history/sessions/{id}.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    #[serde(flatten)]
    pub session: SessionRecord,
    /// Turns in creation order.
    pub conversations: Vec<TurnRecord>,
}

/// Request body for POST /api/history/conversations.
#[derive(Debug, Deserialize)]
pub struct CreateTurnRequest {
    pub session_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub user_message: String,
    pub ai_response: String,
    #[serde(default)]
    pub audio_url_user: Option<String>,
    #[serde(default)]
    pub audio_url_ai: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// POST /api/history/sessions
pub async fn post_session(
    State(state): State<ApiState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionRecord>), ApiError> {
    let session = SessionRecord::new(
        body.user_id,
        body.title,
        body.metadata.map(|m| m.to_string()),
    );
    state.store.create_session(&session).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/history/sessions
pub async fn list_sessions(
    State(state): State<ApiState>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<SessionListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(50);
    if !(1..=100).contains(&limit) {
        return Err(ParloError::Validation("Limit must be between 1 and 100".into()).into());
    }
    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ParloError::Validation("Offset must be non-negative".into()).into());
    }

    let sessions = state
        .store
        .list_sessions(query.user_id.as_deref(), limit, offset)
        .await?;

    let mut summaries = Vec::with_capacity(sessions.len());
    for session in sessions {
        let preview_message = state
            .store
            .first_turn_for_session(&session.id)
            .await?
            .map(|turn| truncate_preview(&turn.user_message));
        summaries.push(SessionSummary {
            session,
            preview_message,
        });
    }

    let total = summaries.len();
    Ok(Json(SessionListResponse {
        sessions: summaries,
        total,
    }))
}

/// GET /api/history/sessions/{id}
pub async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetailResponse>, ApiError> {
    ensure_uuid("session ID", &id)?;
    let session = state
        .store
        .get_session(&id)
        .await?
        .ok_or_else(|| ParloError::NotFound("Session not found".into()))?;
    let conversations = state.store.list_turns_for_session(&id).await?;
    Ok(Json(SessionDetailResponse {
        session,
        conversations,
    }))
}

/// DELETE /api/history/sessions/{id}
pub async fn delete_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ensure_uuid("session ID", &id)?;
    if state.store.delete_session(&id).await? {
        state.orchestrator.forget_session(&id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ParloError::NotFound("Session not found".into()).into())
    }
}

/// POST /api/history/conversations
pub async fn post_conversation(
    State(state): State<ApiState>,
    Json(body): Json<CreateTurnRequest>,
) -> Result<(StatusCode, Json<TurnRecord>), ApiError> {
    ensure_uuid("session ID", &body.session_id)?;
    if state.store.get_session(&body.session_id).await?.is_none() {
        return Err(ParloError::NotFound("Session not found".into()).into());
    }

    let turn = TurnRecord::new(
        body.session_id,
        body.user_id,
        body.user_message,
        body.ai_response,
        body.audio_url_user,
        body.audio_url_ai,
        body.metadata.map(|m| m.to_string()),
    );
    state.store.insert_turn(&turn).await?;
    Ok((StatusCode::CREATED, Json(turn)))
}

/// GET /api/history/conversations/{id}
pub async fn get_conversation(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<TurnRecord>, ApiError> {
    ensure_uuid("conversation ID", &id)?;
    let turn = state
        .store
        .get_turn(&id)
        .await?
        .ok_or_else(|| ParloError::NotFound("Conversation not found".into()))?;
    Ok(Json(turn))
}

/// DELETE /api/history/conversations/{id}
pub async fn delete_conversation(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ensure_uuid("conversation ID", &id)?;
    if state.store.delete_turn(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ParloError::NotFound("Conversation not found".into()).into())
    }
}

/// First [`MAX_PREVIEW_CHARS`] characters of a message.
fn truncate_preview(message: &str) -> String {
    message.chars().take(MAX_PREVIEW_CHARS).collect()
}
