// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full-stack test harness.
//!
//! `TestHarness` assembles the complete API stack with mock collaborators,
//! temp SQLite databases, and a live axum server on an ephemeral port, so
//! integration tests can drive real HTTP requests end to end.

use std::sync::Arc;

use parlo_config::model::StorageConfig;
use parlo_core::{ParloError, SpeechSynthesizer};
use parlo_gateway::{build_router, ApiState};
use parlo_memory::{ConversationMemory, VectorStore};
use parlo_orchestrator::Orchestrator;
use parlo_speech::AudioStore;
use parlo_storage::SqliteStore;

use crate::embedder::DeterministicEmbedder;
use crate::mock_provider::MockChatProvider;
use crate::mock_synthesizer::MockSynthesizer;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    enable_memory: bool,
    default_voice: String,
    default_speed: f32,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            enable_memory: false,
            default_voice: "com".to_string(),
            default_speed: 1.0,
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Enable retrieval memory backed by the deterministic embedder.
    pub fn with_memory(mut self) -> Self {
        self.enable_memory = true;
        self
    }

    /// Set the default voice handed to the synthesizer.
    pub fn with_default_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    /// Set the default playback speed used when requests leave it unset.
    pub fn with_default_speed(mut self, speed: f32) -> Self {
        self.default_speed = speed;
        self
    }

    /// Build the harness and start the API server.
    pub async fn build(self) -> Result<TestHarness, ParloError> {
        let temp_dir = tempfile::TempDir::new()
            .map_err(|e| ParloError::Internal(format!("failed to create temp dir: {e}")))?;

        let storage_config = StorageConfig {
            database_path: temp_dir
                .path()
                .join("test.db")
                .to_string_lossy()
                .to_string(),
            wal_mode: true,
        };
        let store = Arc::new(SqliteStore::open(&storage_config).await?);

        let audio = Arc::new(AudioStore::new(temp_dir.path().join("audio"))?);

        let provider = Arc::new(if self.responses.is_empty() {
            MockChatProvider::new()
        } else {
            MockChatProvider::with_responses(self.responses)
        });
        let synthesizer = Arc::new(MockSynthesizer::new(audio.clone()));

        let memory = if self.enable_memory {
            let vector_path = temp_dir.path().join("memory.db");
            let vector_store = VectorStore::open(&vector_path.to_string_lossy()).await?;
            Some(Arc::new(ConversationMemory::new(
                Arc::new(DeterministicEmbedder),
                vector_store,
            )))
        } else {
            None
        };

        let orchestrator = Arc::new(Orchestrator::new(
            provider.clone(),
            memory.clone(),
            1024,
            0.7,
            3,
        ));

        let state = ApiState {
            store: store.clone(),
            orchestrator: orchestrator.clone(),
            synthesizer: synthesizer.clone() as Arc<dyn SpeechSynthesizer>,
            audio: audio.clone(),
            default_voice: self.default_voice,
            default_speed: self.default_speed,
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| ParloError::Channel {
                message: format!("failed to bind test server: {e}"),
                source: Some(Box::new(e)),
            })?;
        let addr = listener.local_addr().map_err(|e| ParloError::Channel {
            message: format!("failed to read test server address: {e}"),
            source: Some(Box::new(e)),
        })?;

        let app = build_router(state);
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "test server exited");
            }
        });

        Ok(TestHarness {
            provider,
            synthesizer,
            store,
            audio,
            memory,
            orchestrator,
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            _server: server,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment: mocks, temp storage, and a live server.
pub struct TestHarness {
    /// The mock chat provider.
    pub provider: Arc<MockChatProvider>,
    /// The mock synthesizer (writes real files under the temp audio dir).
    pub synthesizer: Arc<MockSynthesizer>,
    /// Relational store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteStore>,
    /// Audio file store rooted in the temp dir.
    pub audio: Arc<AudioStore>,
    /// Retrieval memory, present when enabled on the builder.
    pub memory: Option<Arc<ConversationMemory>>,
    /// The orchestrator behind the server.
    pub orchestrator: Arc<Orchestrator>,
    /// HTTP client pointed at the test server.
    pub client: reqwest::Client,
    base_url: String,
    _server: tokio::task::JoinHandle<()>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Base URL of the running test server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self._server.abort();
    }
}
