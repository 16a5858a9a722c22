// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completion provider trait.

use async_trait::async_trait;

use crate::error::ParloError;
use crate::types::{ChatReply, ChatRequest};

/// A hosted chat-completion API.
///
/// Implementations own their HTTP client and credentials. Callers build the
/// full transcript; the provider performs exactly one completion per call.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Identifier of the model completions are requested with.
    fn model_id(&self) -> &str;

    /// Sends a completion request and returns the full reply.
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, ParloError>;
}
