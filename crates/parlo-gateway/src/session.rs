// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared session resolution for the chat endpoints.

use parlo_core::ParloError;
use parlo_storage::models::SessionRecord;
use parlo_storage::SqliteStore;
use tracing::info;

/// Longest session title derived from a first message.
pub const MAX_TITLE_CHARS: usize = 50;

/// Resolves a requested session id or creates a fresh session.
///
/// A supplied id is used when it parses as a UUID and names an existing
/// session; anything else (absent, malformed, or unknown) silently falls
/// through to creating a new session titled from `title`. The strict
/// 400/404 taxonomy applies to the history endpoints only, not here.
pub async fn resolve_or_create_session(
    store: &SqliteStore,
    requested: Option<&str>,
    user_id: Option<String>,
    title: &str,
) -> Result<SessionRecord, ParloError> {
    if let Some(raw) = requested {
        if uuid::Uuid::parse_str(raw).is_ok() {
            if let Some(existing) = store.get_session(raw).await? {
                return Ok(existing);
            }
        }
    }

    let session = SessionRecord::new(user_id, Some(truncate_title(title)), None);
    store.create_session(&session).await?;
    info!(session_id = %session.id, "created new chat session");
    Ok(session)
}

/// First [`MAX_TITLE_CHARS`] characters of a message, for session titles.
fn truncate_title(message: &str) -> String {
    message.chars().take(MAX_TITLE_CHARS).collect()
}
