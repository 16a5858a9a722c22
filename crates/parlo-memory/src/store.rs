// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed vector store with BLOB embeddings and a cosine scan.

use parlo_core::ParloError;
use tokio_rusqlite::Connection;

use crate::types::{blob_to_vec, cosine_similarity, vec_to_blob, ScoredEntry};

/// Helper to convert tokio_rusqlite errors into ParloError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> ParloError {
    ParloError::Storage {
        source: Box::new(e),
    }
}

/// Persistent store for embedded conversation turns.
///
/// Entries are keyed `{session_id}_{n}` where `n` is a per-session running
/// counter. Retrieval scans the whole corpus; it is deliberately not scoped
/// to one session so a learner's earlier threads can inform later ones.
pub struct VectorStore {
    conn: Connection,
}

impl VectorStore {
    /// Open (or create) the vector store at `path` and ensure its schema.
    pub async fn open(path: &str) -> Result<Self, ParloError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ParloError::Storage { source: Box::new(e) })?;
            }
        }
        let conn = Connection::open(path)
            .await
            .map_err(|e| storage_err(e.into()))?;
        Self::ensure_schema(&conn).await?;
        Ok(Self { conn })
    }

    /// Open an in-memory store, for tests.
    pub async fn open_in_memory() -> Result<Self, ParloError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| storage_err(e.into()))?;
        Self::ensure_schema(&conn).await?;
        Ok(Self { conn })
    }

    async fn ensure_schema(conn: &Connection) -> Result<(), ParloError> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 CREATE TABLE IF NOT EXISTS entries (
                     key TEXT PRIMARY KEY NOT NULL,
                     session_id TEXT NOT NULL,
                     content TEXT NOT NULL,
                     embedding BLOB NOT NULL,
                     created_at TEXT NOT NULL
                 );
                 CREATE INDEX IF NOT EXISTS idx_entries_session ON entries(session_id);",
            )?;
            Ok(())
        })
        .await
        .map_err(storage_err)
    }

    /// Insert an embedded entry.
    pub async fn insert(
        &self,
        key: &str,
        session_id: &str,
        content: &str,
        embedding: &[f32],
    ) -> Result<(), ParloError> {
        let key = key.to_string();
        let session_id = session_id.to_string();
        let content = content.to_string();
        let blob = vec_to_blob(embedding);
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO entries (key, session_id, content, embedding, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![key, session_id, content, blob, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Total number of stored entries.
    pub async fn count(&self) -> Result<u64, ParloError> {
        self.conn
            .call(|conn| {
                let n: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
                Ok(n as u64)
            })
            .await
            .map_err(storage_err)
    }

    /// Number of entries stored for one session (the next key suffix).
    pub async fn count_for_session(&self, session_id: &str) -> Result<u64, ParloError> {
        let session_id = session_id.to_string();
        self.conn
            .call(move |conn| {
                let n: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE session_id = ?1",
                    rusqlite::params![session_id],
                    |row| row.get(0),
                )?;
                Ok(n as u64)
            })
            .await
            .map_err(storage_err)
    }

    /// Top-k entries by cosine similarity against `query`, over the whole
    /// corpus. Linear scan; the corpus is small enough that nothing fancier
    /// is warranted.
    pub async fn top_k(&self, query: &[f32], k: usize) -> Result<Vec<ScoredEntry>, ParloError> {
        let query = query.to_vec();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT key, content, embedding FROM entries")?;
                let mut scored: Vec<ScoredEntry> = stmt
                    .query_map([], |row| {
                        let key: String = row.get(0)?;
                        let content: String = row.get(1)?;
                        let blob: Vec<u8> = row.get(2)?;
                        Ok((key, content, blob))
                    })?
                    .filter_map(|row| row.ok())
                    .map(|(key, content, blob)| {
                        let embedding = blob_to_vec(&blob);
                        let score = if embedding.len() == query.len() {
                            cosine_similarity(&query, &embedding)
                        } else {
                            f32::MIN
                        };
                        ScoredEntry { key, content, score }
                    })
                    .collect();

                scored.sort_by(|a, b| b.score.total_cmp(&a.score));
                scored.truncate(k);
                Ok(scored)
            })
            .await
            .map_err(storage_err)
    }
}
