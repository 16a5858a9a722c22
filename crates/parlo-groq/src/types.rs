// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq chat-completion API request/response types (OpenAI-compatible).

use serde::{Deserialize, Serialize};

/// A request to `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g., "llama3-70b-8192").
    pub model: String,
    /// Conversation messages, system message first.
    pub messages: Vec<WireMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A single message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A response from `POST /chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    /// Response identifier.
    pub id: String,
    /// Model that produced the completion.
    pub model: String,
    /// Generated choices; exactly one is requested.
    pub choices: Vec<Choice>,
    /// Token accounting.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// One generated completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Index within the choices array.
    pub index: u32,
    /// The generated message.
    pub message: WireMessage,
    /// Why generation stopped (e.g., "stop", "length").
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage for a completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Error envelope returned by the API on failure.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error payload within [`ApiErrorResponse`].
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message.
    pub message: String,
    /// Error category (e.g., "invalid_request_error").
    #[serde(rename = "type", default)]
    pub type_: String,
}
