// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech synthesis trait.

use async_trait::async_trait;

use crate::error::ParloError;
use crate::types::{SynthesisArtifact, SynthesisRequest};

/// A text-to-speech backend that renders audio files to local storage.
///
/// Every call produces a fresh file; identical inputs are not deduplicated
/// and nothing is cached.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Renders `request.text` to an audio file and returns its description.
    async fn synthesize(&self, request: SynthesisRequest)
    -> Result<SynthesisArtifact, ParloError>;
}
