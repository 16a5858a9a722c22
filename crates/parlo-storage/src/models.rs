// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted record types for sessions and conversation turns.
//!
//! Timestamps are RFC 3339 UTC strings; `metadata` columns hold a JSON
//! object serialized to text.

use serde::{Deserialize, Serialize};

/// One conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: i64,
    /// JSON object serialized to text.
    pub metadata: Option<String>,
}

impl SessionRecord {
    /// Build a fresh session with a generated id, zero message count, and
    /// identical creation/update timestamps.
    pub fn new(
        user_id: Option<String>,
        title: Option<String>,
        metadata: Option<String>,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            created_at: now.clone(),
            updated_at: now,
            message_count: 0,
            metadata,
        }
    }
}

/// One user-message/AI-response exchange. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: String,
    pub session_id: String,
    pub user_id: Option<String>,
    pub user_message: String,
    pub ai_response: String,
    pub audio_url_user: Option<String>,
    pub audio_url_ai: Option<String>,
    pub created_at: String,
    /// JSON object serialized to text.
    pub metadata: Option<String>,
}

impl TurnRecord {
    /// Build a fresh turn with a generated id and creation timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: String,
        user_id: Option<String>,
        user_message: String,
        ai_response: String,
        audio_url_user: Option<String>,
        audio_url_ai: Option<String>,
        metadata: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id,
            user_id,
            user_message,
            ai_response,
            audio_url_user,
            audio_url_ai,
            created_at: now_rfc3339(),
            metadata,
        }
    }
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn now_rfc3339() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
