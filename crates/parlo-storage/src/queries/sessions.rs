// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session CRUD operations.

use parlo_core::ParloError;
use rusqlite::params;

use crate::database::Database;
use crate::models::SessionRecord;

const SESSION_COLUMNS: &str =
    "id, user_id, title, created_at, updated_at, message_count, metadata";

fn row_to_session(row: &rusqlite::Row) -> Result<SessionRecord, rusqlite::Error> {
    Ok(SessionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        message_count: row.get(5)?,
        metadata: row.get(6)?,
    })
}

/// Create a new session.
pub async fn create_session(db: &Database, session: &SessionRecord) -> Result<(), ParloError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, user_id, title, created_at, updated_at, message_count, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session.id,
                    session.user_id,
                    session.title,
                    session.created_at,
                    session.updated_at,
                    session.message_count,
                    session.metadata,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by ID.
pub async fn get_session(db: &Database, id: &str) -> Result<Option<SessionRecord>, ParloError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List sessions most-recently-updated first, optionally filtered by owning
/// user, paginated by limit/offset. Ties on `updated_at` break by rowid so
/// the order is stable.
pub async fn list_sessions(
    db: &Database,
    user_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<SessionRecord>, ParloError> {
    let user_id = user_id.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut sessions = Vec::new();
            match &user_id {
                Some(user) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SESSION_COLUMNS} FROM sessions WHERE user_id = ?1
                         ORDER BY updated_at DESC, rowid DESC LIMIT ?2 OFFSET ?3"
                    ))?;
                    let rows = stmt.query_map(params![user, limit, offset], row_to_session)?;
                    for row in rows {
                        sessions.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SESSION_COLUMNS} FROM sessions
                         ORDER BY updated_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
                    ))?;
                    let rows = stmt.query_map(params![limit, offset], row_to_session)?;
                    for row in rows {
                        sessions.push(row?);
                    }
                }
            }
            Ok(sessions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a session and, via a single transaction, every turn that
/// references it. Returns false when no such session exists.
pub async fn delete_session(db: &Database, id: &str) -> Result<bool, ParloError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            // ON DELETE CASCADE removes the turns; the explicit delete keeps
            // the cascade inside this transaction even with FKs disabled.
            tx.execute(
                "DELETE FROM conversations WHERE session_id = ?1",
                params![id],
            )?;
            let deleted = tx.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(deleted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
