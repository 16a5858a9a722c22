// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parlo backend.

use thiserror::Error;

/// The primary error type used across all Parlo components.
///
/// The HTTP layer maps variants onto status codes: [`ParloError::Validation`]
/// becomes 400, [`ParloError::NotFound`] becomes 404, and everything else is
/// reported as 500 with the error's display text in the response body.
#[derive(Debug, Error)]
pub enum ParloError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed caller input (bad identifiers, empty text, out-of-range values).
    #[error("{0}")]
    Validation(String),

    /// A well-formed identifier that does not name an existing record or file.
    #[error("{0}")]
    NotFound(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat-completion provider errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Speech synthesis errors (upstream TTS failure, audio file I/O).
    #[error("failed to synthesize speech: {message}")]
    Synthesis {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transport errors outside a single request (socket bind, listener setup).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParloError {
    /// Wraps a provider failure without an underlying source error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a synthesis failure without an underlying source error.
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
            source: None,
        }
    }
}
