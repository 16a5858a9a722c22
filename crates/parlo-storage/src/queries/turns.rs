// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation-turn CRUD operations.
//!
//! Inserting a turn bumps the owning session's `message_count` and
//! `updated_at` in the same transaction, so readers never observe a turn
//! whose session still carries the old counters.

use parlo_core::ParloError;
use rusqlite::params;

use crate::database::Database;
use crate::models::TurnRecord;

const TURN_COLUMNS: &str = "id, session_id, user_id, user_message, ai_response, \
     audio_url_user, audio_url_ai, created_at, metadata";

fn row_to_turn(row: &rusqlite::Row) -> Result<TurnRecord, rusqlite::Error> {
    Ok(TurnRecord {
        id: row.get(0)?,
        session_id: row.get(1)?,
        user_id: row.get(2)?,
        user_message: row.get(3)?,
        ai_response: row.get(4)?,
        audio_url_user: row.get(5)?,
        audio_url_ai: row.get(6)?,
        created_at: row.get(7)?,
        metadata: row.get(8)?,
    })
}

/// Insert a turn and bump the owning session's counters atomically.
pub async fn insert_turn(db: &Database, turn: &TurnRecord) -> Result<(), ParloError> {
    let turn = turn.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO conversations (id, session_id, user_id, user_message, ai_response,
                                            audio_url_user, audio_url_ai, created_at, metadata)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    turn.id,
                    turn.session_id,
                    turn.user_id,
                    turn.user_message,
                    turn.ai_response,
                    turn.audio_url_user,
                    turn.audio_url_ai,
                    turn.created_at,
                    turn.metadata,
                ],
            )?;
            tx.execute(
                "UPDATE sessions SET message_count = message_count + 1, updated_at = ?1
                 WHERE id = ?2",
                params![turn.created_at, turn.session_id],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a turn by ID.
pub async fn get_turn(db: &Database, id: &str) -> Result<Option<TurnRecord>, ParloError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TURN_COLUMNS} FROM conversations WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_turn);
            match result {
                Ok(turn) => Ok(Some(turn)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all turns for a session in chronological order.
pub async fn list_turns_for_session(
    db: &Database,
    session_id: &str,
) -> Result<Vec<TurnRecord>, ParloError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TURN_COLUMNS} FROM conversations WHERE session_id = ?1
                 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![session_id], row_to_turn)?;
            let mut turns = Vec::new();
            for row in rows {
                turns.push(row?);
            }
            Ok(turns)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Earliest turn for a session, used for list previews.
pub async fn first_turn_for_session(
    db: &Database,
    session_id: &str,
) -> Result<Option<TurnRecord>, ParloError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TURN_COLUMNS} FROM conversations WHERE session_id = ?1
                 ORDER BY created_at ASC, rowid ASC LIMIT 1"
            ))?;
            let result = stmt.query_row(params![session_id], row_to_turn);
            match result {
                Ok(turn) => Ok(Some(turn)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a single turn. Returns false when no such turn exists.
pub async fn delete_turn(db: &Database, id: &str) -> Result<bool, ParloError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM conversations WHERE id = ?1", params![id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionRecord;
    use crate::queries::sessions::{create_session, delete_session, get_session};
    use tempfile::tempdir;

    async fn setup_db_with_session() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let session = SessionRecord {
            id: "sess-1".to_string(),
            user_id: None,
            title: Some("Turns".to_string()),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
            message_count: 0,
            metadata: None,
        };
        create_session(&db, &session).await.unwrap();
        (db, dir)
    }

    fn make_turn(id: &str, timestamp: &str) -> TurnRecord {
        TurnRecord {
            id: id.to_string(),
            session_id: "sess-1".to_string(),
            user_id: None,
            user_message: "Hello".to_string(),
            ai_response: "Hi there!".to_string(),
            audio_url_user: None,
            audio_url_ai: Some("/audio/reply.mp3".to_string()),
            created_at: timestamp.to_string(),
            metadata: Some(r#"{"language":"en"}"#.to_string()),
        }
    }

    #[tokio::test]
    async fn insert_and_list_turns_in_order() {
        let (db, _dir) = setup_db_with_session().await;

        insert_turn(&db, &make_turn("t2", "2026-01-01T00:00:02.000Z"))
            .await
            .unwrap();
        insert_turn(&db, &make_turn("t1", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        let turns = list_turns_for_session(&db, "sess-1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].id, "t1");
        assert_eq!(turns[1].id, "t2");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn insert_turn_bumps_session_counters() {
        let (db, _dir) = setup_db_with_session().await;

        insert_turn(&db, &make_turn("t1", "2026-01-01T00:00:05.000Z"))
            .await
            .unwrap();
        insert_turn(&db, &make_turn("t2", "2026-01-01T00:00:06.000Z"))
            .await
            .unwrap();

        let session = get_session(&db, "sess-1").await.unwrap().unwrap();
        assert_eq!(session.message_count, 2);
        assert_eq!(session.updated_at, "2026-01-01T00:00:06.000Z");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn insert_turn_without_session_fails() {
        let (db, _dir) = setup_db_with_session().await;
        let mut orphan = make_turn("orphan", "2026-01-01T00:00:01.000Z");
        orphan.session_id = "no-such-session".to_string();

        let result = insert_turn(&db, &orphan).await;
        assert!(result.is_err(), "FK constraint should reject the orphan");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn first_turn_is_the_chronologically_earliest() {
        let (db, _dir) = setup_db_with_session().await;
        assert!(first_turn_for_session(&db, "sess-1").await.unwrap().is_none());

        insert_turn(&db, &make_turn("later", "2026-01-01T00:00:09.000Z"))
            .await
            .unwrap();
        insert_turn(&db, &make_turn("earlier", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        let first = first_turn_for_session(&db, "sess-1").await.unwrap().unwrap();
        assert_eq!(first.id, "earlier");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_turn_reports_whether_a_row_existed() {
        let (db, _dir) = setup_db_with_session().await;
        insert_turn(&db, &make_turn("t1", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        assert!(delete_turn(&db, "t1").await.unwrap());
        assert!(get_turn(&db, "t1").await.unwrap().is_none());
        assert!(!delete_turn(&db, "t1").await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn session_delete_cascades_to_turns() {
        let (db, _dir) = setup_db_with_session().await;
        insert_turn(&db, &make_turn("t1", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();
        insert_turn(&db, &make_turn("t2", "2026-01-01T00:00:02.000Z"))
            .await
            .unwrap();

        assert!(delete_session(&db, "sess-1").await.unwrap());
        assert!(get_turn(&db, "t1").await.unwrap().is_none());
        assert!(get_turn(&db, "t2").await.unwrap().is_none());

        db.close().await.unwrap();
    }
}
