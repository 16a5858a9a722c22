// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock speech synthesizer for deterministic testing.

use std::sync::Arc;

use async_trait::async_trait;
use parlo_core::types::{SynthesisArtifact, SynthesisRequest};
use parlo_core::{ParloError, SpeechSynthesizer};
use parlo_speech::AudioStore;
use tokio::sync::Mutex;

/// Placeholder bytes written in place of real mp3 data.
const FAKE_MP3: &[u8] = b"ID3fake-mp3-for-tests";

/// A synthesizer that skips the network but writes real files through the
/// real [`AudioStore`], so file serving and deletion behave as in
/// production. Every request is recorded for assertions.
pub struct MockSynthesizer {
    audio: Arc<AudioStore>,
    requests: Arc<Mutex<Vec<SynthesisRequest>>>,
}

impl MockSynthesizer {
    pub fn new(audio: Arc<AudioStore>) -> Self {
        Self {
            audio,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All synthesis requests received so far, in order.
    pub async fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesisArtifact, ParloError> {
        request.validate()?;
        self.requests.lock().await.push(request.clone());

        let filename = format!("{}.mp3", uuid::Uuid::new_v4());
        self.audio.save(&filename, FAKE_MP3).await?;

        Ok(SynthesisArtifact {
            audio_url: format!("/audio/{filename}"),
            filename,
            format: "mp3".to_string(),
            voice: request.voice,
            speed: request.speed,
            file_size: FAKE_MP3.len() as u64,
            text_length: request.text.chars().count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SynthesisRequest {
        SynthesisRequest {
            text: "hello".into(),
            voice: "com".into(),
            speed: 1.0,
            language: "en".into(),
        }
    }

    #[tokio::test]
    async fn writes_a_real_file_and_records_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let audio = Arc::new(AudioStore::new(dir.path()).unwrap());
        let synth = MockSynthesizer::new(audio.clone());

        let artifact = synth.synthesize(request()).await.unwrap();
        assert!(audio.resolve(&artifact.filename).await.unwrap().is_some());
        assert_eq!(artifact.file_size, FAKE_MP3.len() as u64);

        let seen = synth.requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].text, "hello");
    }

    #[tokio::test]
    async fn invalid_requests_are_still_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let audio = Arc::new(AudioStore::new(dir.path()).unwrap());
        let synth = MockSynthesizer::new(audio);

        let bad = SynthesisRequest {
            text: "".into(),
            ..request()
        };
        assert!(matches!(
            synth.synthesize(bad).await,
            Err(ParloError::Validation(_))
        ));
        assert!(synth.requests().await.is_empty());
    }
}
