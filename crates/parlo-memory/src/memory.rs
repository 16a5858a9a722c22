// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remember/recall facade over the embedder and vector store.

use std::sync::Arc;

use parlo_core::traits::Embedder;
use parlo_core::ParloError;
use tracing::debug;

use crate::store::VectorStore;

/// Retrieval memory over prior conversation turns.
///
/// `remember` embeds one completed exchange and stores it keyed
/// `{session_id}_{n}`; `recall` returns the texts of the most similar
/// stored exchanges from the whole corpus.
pub struct ConversationMemory {
    embedder: Arc<dyn Embedder>,
    store: VectorStore,
}

impl ConversationMemory {
    pub fn new(embedder: Arc<dyn Embedder>, store: VectorStore) -> Self {
        Self { embedder, store }
    }

    /// Store one completed exchange for later retrieval.
    pub async fn remember(
        &self,
        session_id: &str,
        user_message: &str,
        ai_response: &str,
    ) -> Result<(), ParloError> {
        let content = format!("User: {user_message}\nAI: {ai_response}");
        let embedding = self.embedder.embed(&content).await?;
        let n = self.store.count_for_session(session_id).await?;
        let key = format!("{session_id}_{n}");
        self.store
            .insert(&key, session_id, &content, &embedding)
            .await?;
        debug!(key, "conversation turn stored in retrieval memory");
        Ok(())
    }

    /// Texts of the `k` stored exchanges most similar to `query`, best first.
    ///
    /// Empty when the corpus is empty.
    pub async fn recall(&self, query: &str, k: usize) -> Result<Vec<String>, ParloError> {
        if self.store.count().await? == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embedder.embed(query).await?;
        let entries = self.store.top_k(&embedding, k).await?;
        Ok(entries.into_iter().map(|e| e.content).collect())
    }

    /// Total number of stored exchanges.
    pub async fn count(&self) -> Result<u64, ParloError> {
        self.store.count().await
    }
}
