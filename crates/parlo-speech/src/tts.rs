// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Translate TTS client.
//!
//! The endpoint is the undocumented `translate_tts` GET used by the
//! Translate web client. It only distinguishes normal and slow playback;
//! speeds below 0.9 select slow mode. The accent TLD (voice) is honored for
//! English only, every other language goes through `translate.google.com`.

use std::time::Duration;

use async_trait::async_trait;
use parlo_core::types::{SynthesisArtifact, SynthesisRequest};
use parlo_core::{ParloError, SpeechSynthesizer};
use tracing::{debug, info};
use uuid::Uuid;

use crate::audio_store::AudioStore;

/// Speeds below this threshold select the endpoint's slow playback mode.
const SLOW_SPEED_THRESHOLD: f32 = 0.9;

/// `ttsspeed` value the endpoint uses for slow playback.
const TTSSPEED_SLOW: &str = "0.24";
const TTSSPEED_NORMAL: &str = "1";

/// Renders text to mp3 via the Google Translate TTS endpoint and writes the
/// result through an [`AudioStore`].
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    store: AudioStore,
    #[cfg(test)]
    base_override: Option<String>,
}

impl GoogleTranslateTts {
    pub fn new(store: AudioStore) -> Result<Self, ParloError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ParloError::Synthesis {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            store,
            #[cfg(test)]
            base_override: None,
        })
    }

    /// Overrides the endpoint URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_override = Some(url);
        self
    }

    fn endpoint(&self, tld: &str) -> String {
        #[cfg(test)]
        if let Some(base) = &self.base_override {
            return format!("{base}/translate_tts");
        }
        format!("https://translate.google.{tld}/translate_tts")
    }

    /// Convenience for the language-learning flow: Vietnamese output with a
    /// slightly slowed default (0.9) unless the caller specifies a speed.
    pub async fn synthesize_vietnamese(
        &self,
        text: &str,
        speed: Option<f32>,
    ) -> Result<SynthesisArtifact, ParloError> {
        self.synthesize(SynthesisRequest {
            text: text.to_string(),
            voice: "com".into(),
            speed: speed.unwrap_or(0.9),
            language: "vi".into(),
        })
        .await
    }

    async fn fetch_audio(&self, request: &SynthesisRequest) -> Result<Vec<u8>, ParloError> {
        // The regional accent only exists for English voices.
        let tld = if request.language == "en" {
            request.voice.as_str()
        } else {
            "com"
        };
        let ttsspeed = if request.speed < SLOW_SPEED_THRESHOLD {
            TTSSPEED_SLOW
        } else {
            TTSSPEED_NORMAL
        };

        let url = self.endpoint(tld);
        debug!(
            language = %request.language,
            tld,
            ttsspeed,
            text_length = request.text.chars().count(),
            "requesting speech synthesis"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", request.text.as_str()),
                ("tl", request.language.as_str()),
                ("client", "tw-ob"),
                ("ttsspeed", ttsspeed),
            ])
            .send()
            .await
            .map_err(|e| ParloError::Synthesis {
                message: format!("TTS request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParloError::synthesis(format!(
                "TTS endpoint returned {status}"
            )));
        }

        let bytes = response.bytes().await.map_err(|e| ParloError::Synthesis {
            message: format!("failed to read TTS response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
    ) -> Result<SynthesisArtifact, ParloError> {
        request.validate()?;

        let audio = self.fetch_audio(&request).await?;
        let filename = format!("{}.mp3", Uuid::new_v4());
        self.store.save(&filename, &audio).await?;

        info!(
            filename,
            size = audio.len(),
            language = %request.language,
            "speech synthesized"
        );

        Ok(SynthesisArtifact {
            audio_url: format!("/audio/{filename}"),
            filename,
            format: "mp3".into(),
            voice: request.voice,
            speed: request.speed,
            file_size: audio.len() as u64,
            text_length: request.text.chars().count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(speed: f32, language: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: "Xin chào".into(),
            voice: "com".into(),
            speed,
            language: language.into(),
        }
    }

    async fn tts(server: &MockServer) -> (tempfile::TempDir, GoogleTranslateTts) {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path()).unwrap();
        let tts = GoogleTranslateTts::new(store)
            .unwrap()
            .with_base_url(server.uri());
        (dir, tts)
    }

    #[tokio::test]
    async fn synthesize_writes_uuid_mp3_and_describes_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("ie", "UTF-8"))
            .and(query_param("tl", "vi"))
            .and(query_param("client", "tw-ob"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-bytes".to_vec()))
            .mount(&server)
            .await;

        let (dir, tts) = tts(&server).await;
        let artifact = tts.synthesize(request(1.0, "vi")).await.unwrap();

        assert!(artifact.filename.ends_with(".mp3"));
        assert_eq!(artifact.audio_url, format!("/audio/{}", artifact.filename));
        assert_eq!(artifact.format, "mp3");
        assert_eq!(artifact.file_size, 9);
        assert_eq!(artifact.text_length, "Xin chào".chars().count());
        assert!(dir.path().join(&artifact.filename).is_file());
    }

    #[tokio::test]
    async fn slow_speed_selects_slow_playback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("ttsspeed", "0.24"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, tts) = tts(&server).await;
        tts.synthesize(request(0.8, "vi")).await.unwrap();
    }

    #[tokio::test]
    async fn normal_speed_selects_normal_playback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("ttsspeed", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, tts) = tts(&server).await;
        tts.synthesize(request(1.0, "vi")).await.unwrap();
    }

    #[tokio::test]
    async fn vietnamese_convenience_default_stays_normal_playback() {
        // The 0.9 default sits exactly on the threshold; slow mode engages
        // only strictly below it.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "vi"))
            .and(query_param("ttsspeed", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, tts) = tts(&server).await;
        let artifact = tts.synthesize_vietnamese("Xin chào", None).await.unwrap();
        assert!((artifact.speed - 0.9).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn vietnamese_convenience_honors_explicit_slow_speed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "vi"))
            .and(query_param("ttsspeed", "0.24"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, tts) = tts(&server).await;
        let artifact = tts
            .synthesize_vietnamese("Xin chào", Some(0.5))
            .await
            .unwrap();
        assert!((artifact.speed - 0.5).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_synthesis_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (_dir, tts) = tts(&server).await;
        let err = tts.synthesize(request(1.0, "vi")).await.unwrap_err();
        assert!(matches!(err, ParloError::Synthesis { .. }));
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_any_call() {
        let server = MockServer::start().await;
        // No mock mounted: a request hitting the server would 404 and the
        // error would be Synthesis, not Validation.
        let (_dir, tts) = tts(&server).await;
        let err = tts.synthesize(request(5.0, "vi")).await.unwrap_err();
        assert!(matches!(err, ParloError::Validation(_)));
    }
}
