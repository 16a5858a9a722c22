// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! High-level storage facade used by the HTTP layer.

use parlo_core::ParloError;
use parlo_config::model::StorageConfig;
use tracing::debug;

use crate::database::Database;
use crate::models::{SessionRecord, TurnRecord};
use crate::queries;

/// SQLite-backed store for sessions and conversation turns.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. Constructed once at startup and shared behind an
/// `Arc` by the request handlers.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the store at the configured path, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, ParloError> {
        let db =
            Database::open_with_options(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store opened");
        Ok(Self { db })
    }

    /// Verify the connection answers a trivial query.
    pub async fn health_check(&self) -> Result<(), ParloError> {
        self.db
            .connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), ParloError> {
        self.db.close().await
    }

    // --- Session operations ---

    pub async fn create_session(&self, session: &SessionRecord) -> Result<(), ParloError> {
        queries::sessions::create_session(&self.db, session).await
    }

    pub async fn get_session(&self, id: &str) -> Result<Option<SessionRecord>, ParloError> {
        queries::sessions::get_session(&self.db, id).await
    }

    pub async fn list_sessions(
        &self,
        user_id: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SessionRecord>, ParloError> {
        queries::sessions::list_sessions(&self.db, user_id, limit, offset).await
    }

    pub async fn delete_session(&self, id: &str) -> Result<bool, ParloError> {
        queries::sessions::delete_session(&self.db, id).await
    }

    // --- Turn operations ---

    pub async fn insert_turn(&self, turn: &TurnRecord) -> Result<(), ParloError> {
        queries::turns::insert_turn(&self.db, turn).await
    }

    pub async fn get_turn(&self, id: &str) -> Result<Option<TurnRecord>, ParloError> {
        queries::turns::get_turn(&self.db, id).await
    }

    pub async fn list_turns_for_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<TurnRecord>, ParloError> {
        queries::turns::list_turns_for_session(&self.db, session_id).await
    }

    pub async fn first_turn_for_session(
        &self,
        session_id: &str,
    ) -> Result<Option<TurnRecord>, ParloError> {
        queries::turns::first_turn_for_session(&self.db, session_id).await
    }

    pub async fn delete_turn(&self, id: &str) -> Result<bool, ParloError> {
        queries::turns::delete_turn(&self.db, id).await
    }
}
