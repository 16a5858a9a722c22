// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parlo backend.
//!
//! This crate provides the error taxonomy, shared domain types, and the
//! collaborator traits implemented by the chat-completion, speech, and
//! embedding integrations. Everything else in the workspace builds on it.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParloError;
pub use types::{ChatMessage, ChatReply, ChatRequest, SynthesisArtifact, SynthesisRequest};

// Re-export collaborator traits at crate root.
pub use traits::{ChatProvider, Embedder, SpeechSynthesizer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parlo_error_has_all_variants() {
        // Verify all 8 error variants exist and can be constructed.
        let _config = ParloError::Config("test".into());
        let _validation = ParloError::Validation("test".into());
        let _not_found = ParloError::NotFound("test".into());
        let _storage = ParloError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _provider = ParloError::Provider {
            message: "test".into(),
            source: None,
        };
        let _synthesis = ParloError::Synthesis {
            message: "test".into(),
            source: None,
        };
        let _channel = ParloError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = ParloError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Compile-time check that the collaborator traits are accessible
        // through the public API and remain object safe.
        fn _assert_chat_provider(_: &dyn ChatProvider) {}
        fn _assert_speech_synthesizer(_: &dyn SpeechSynthesizer) {}
        fn _assert_embedder(_: &dyn Embedder) {}
    }
}
