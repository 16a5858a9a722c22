// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across Parlo components.

use serde::{Deserialize, Serialize};

use crate::error::ParloError;

/// Longest text accepted for a single synthesis call.
pub const MAX_SYNTHESIS_CHARS: usize = 5000;

/// Inclusive bounds for the synthesis speed multiplier.
pub const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.25..=2.0;

// --- Chat completion types ---

/// A single message in a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".into(),
            content: content.into(),
        }
    }
}

/// A completion request handed to a [`crate::traits::ChatProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Full transcript to complete, system message first.
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A completion reply from a [`crate::traits::ChatProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    /// Model identifier the upstream reports having used.
    pub model: String,
}

// --- Speech synthesis types ---

/// Parameters for a single text-to-speech rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    /// Accent selector. For English this picks the regional endpoint
    /// (for example "com", "co.uk", "com.au"); other languages ignore it.
    pub voice: String,
    /// Playback speed multiplier within [`SPEED_RANGE`].
    pub speed: f32,
    /// ISO 639-1 language code, for example "en" or "vi".
    pub language: String,
}

impl SynthesisRequest {
    /// Checks caller-supplied bounds before any upstream call is made.
    pub fn validate(&self) -> Result<(), ParloError> {
        if self.text.trim().is_empty() {
            return Err(ParloError::Validation("Text cannot be empty".into()));
        }
        if self.text.chars().count() > MAX_SYNTHESIS_CHARS {
            return Err(ParloError::Validation(format!(
                "Text exceeds maximum length of {MAX_SYNTHESIS_CHARS} characters"
            )));
        }
        if !SPEED_RANGE.contains(&self.speed) {
            return Err(ParloError::Validation(format!(
                "Speed must be between {} and {}",
                SPEED_RANGE.start(),
                SPEED_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// A rendered audio file on local disk, described for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisArtifact {
    /// Public path of the file, for example `/audio/{filename}`.
    pub audio_url: String,
    pub filename: String,
    pub format: String,
    pub voice: String,
    pub speed: f32,
    pub file_size: u64,
    pub text_length: usize,
}

// --- Identifier helpers ---

/// Validates that `raw` parses as a UUID. `label` names the identifier in the
/// error message, matching the API wording ("Invalid session ID format").
pub fn ensure_uuid(label: &str, raw: &str) -> Result<(), ParloError> {
    uuid::Uuid::parse_str(raw)
        .map(|_| ())
        .map_err(|_| ParloError::Validation(format!("Invalid {label} format")))
}
