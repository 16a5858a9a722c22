// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript management, retrieval augmentation, and completion calls.

use std::sync::Arc;

use dashmap::DashMap;
use parlo_core::types::{ChatMessage, ChatRequest};
use parlo_core::{ChatProvider, ParloError};
use parlo_memory::ConversationMemory;
use tracing::{debug, info, warn};

/// System framing for every completion.
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for a language learning application. \
You should respond naturally and helpfully to user questions. \
Keep your responses clear, concise, and educational.";

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub response: String,
    /// True iff retrieved context was prepended to the prompt.
    pub context_used: bool,
    /// Model identifier the completion was produced with.
    pub model: String,
}

/// Composes a [`ChatProvider`] with optional retrieval memory.
///
/// Transcripts are kept per session id; a request without a session id is
/// stateless (empty history, no memory write-back).
pub struct Orchestrator {
    provider: Arc<dyn ChatProvider>,
    memory: Option<Arc<ConversationMemory>>,
    transcripts: DashMap<String, Vec<ChatMessage>>,
    max_tokens: u32,
    temperature: f32,
    recall_limit: usize,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        memory: Option<Arc<ConversationMemory>>,
        max_tokens: u32,
        temperature: f32,
        recall_limit: usize,
    ) -> Self {
        Self {
            provider,
            memory,
            transcripts: DashMap::new(),
            max_tokens,
            temperature,
            recall_limit,
        }
    }

    /// Model identifier completions are requested with.
    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// Runs one chat turn: retrieval (optional), completion, write-back.
    pub async fn respond(
        &self,
        input: &str,
        session_id: Option<&str>,
        use_rag: bool,
    ) -> Result<ChatOutcome, ParloError> {
        let context = if use_rag {
            self.retrieve_context(input).await?
        } else {
            None
        };
        let context_used = context.is_some();

        let final_input = match &context {
            Some(ctx) => format!("Context: {ctx}\n\nQuestion: {input}"),
            None => input.to_string(),
        };

        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        if let Some(id) = session_id {
            if let Some(history) = self.transcripts.get(id) {
                messages.extend(history.iter().cloned());
            }
        }
        messages.push(ChatMessage::user(&final_input));

        debug!(
            session_id = session_id.unwrap_or("<stateless>"),
            context_used,
            transcript_len = messages.len(),
            "requesting completion"
        );

        let reply = self
            .provider
            .complete(ChatRequest {
                messages,
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            })
            .await?;

        if let Some(id) = session_id {
            self.record_exchange(id, input, &reply.content).await?;
        }

        info!(
            session_id = session_id.unwrap_or("<stateless>"),
            model = %reply.model,
            context_used,
            "chat turn completed"
        );

        Ok(ChatOutcome {
            response: reply.content,
            context_used,
            model: reply.model,
        })
    }

    /// Number of messages in a session's transcript.
    pub fn transcript_len(&self, session_id: &str) -> usize {
        self.transcripts.get(session_id).map_or(0, |t| t.len())
    }

    /// Drops a session's transcript, if any.
    pub fn forget_session(&self, session_id: &str) {
        self.transcripts.remove(session_id);
    }

    /// Top-k retrieval over the whole stored corpus, joined with newlines.
    /// Returns `None` when memory is disabled or nothing matched.
    async fn retrieve_context(&self, input: &str) -> Result<Option<String>, ParloError> {
        let Some(memory) = &self.memory else {
            return Ok(None);
        };
        let hits = memory
            .recall(input, self.recall_limit)
            .await
            .map_err(|e| ParloError::provider(format!("context retrieval failed: {e}")))?;
        if hits.is_empty() {
            Ok(None)
        } else {
            Ok(Some(hits.join("\n")))
        }
    }

    /// Appends the exchange to the session transcript and stores it in
    /// retrieval memory.
    async fn record_exchange(
        &self,
        session_id: &str,
        input: &str,
        response: &str,
    ) -> Result<(), ParloError> {
        {
            let mut transcript = self
                .transcripts
                .entry(session_id.to_string())
                .or_default();
            transcript.push(ChatMessage::user(input));
            transcript.push(ChatMessage::assistant(response));
        }

        if let Some(memory) = &self.memory {
            if let Err(e) = memory.remember(session_id, input, response).await {
                // The reply already exists; losing the memory entry is not
                // worth failing the whole turn for.
                warn!(session_id, error = %e, "failed to store exchange in retrieval memory");
            }
        }
        Ok(())
    }
}
