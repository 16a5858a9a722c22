// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parlo serve` command implementation.
//!
//! Wires storage, retrieval memory, the Groq provider, and speech synthesis
//! into the API server, then serves until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use parlo_config::model::{MemoryConfig, ParloConfig};
use parlo_core::{ChatProvider, ParloError, SpeechSynthesizer};
use parlo_gateway::{ApiState, ServerConfig};
use parlo_groq::GroqClient;
use parlo_memory::{ConversationMemory, ModelManager, OnnxEmbedder, VectorStore};
use parlo_orchestrator::Orchestrator;
use parlo_speech::{AudioStore, GoogleTranslateTts};
use parlo_storage::SqliteStore;
use tracing::{info, warn};

/// Runs the `parlo serve` command.
pub async fn run_serve(config: ParloConfig) -> Result<(), ParloError> {
    init_tracing(&config.server.log_level);

    info!("starting parlo serve");

    // Storage.
    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    store.health_check().await?;

    // Retrieval memory. A failed initialization (for example an offline
    // first run that cannot download the embedding model) degrades to
    // serving without retrieval rather than refusing to start.
    let memory = if config.memory.enabled {
        match initialize_memory(&config.memory).await {
            Ok(memory) => Some(memory),
            Err(e) => {
                warn!(error = %e, "retrieval memory initialization failed, continuing without it");
                None
            }
        }
    } else {
        info!("retrieval memory disabled by configuration");
        None
    };

    // Chat provider.
    let api_key = config.groq.api_key.clone().ok_or_else(|| {
        ParloError::Config(
            "groq.api_key is required to serve (set PARLO_GROQ_API_KEY)".into(),
        )
    })?;
    let provider: Arc<dyn ChatProvider> =
        Arc::new(GroqClient::new(&api_key, config.groq.model.clone())?);
    info!(model = %config.groq.model, "Groq provider initialized");

    // Speech synthesis.
    let audio = Arc::new(AudioStore::new(&config.speech.audio_dir)?);
    let synthesizer: Arc<dyn SpeechSynthesizer> =
        Arc::new(GoogleTranslateTts::new(audio.as_ref().clone())?);

    let orchestrator = Arc::new(Orchestrator::new(
        provider,
        memory,
        config.groq.max_tokens,
        config.groq.temperature,
        config.memory.max_results,
    ));

    let state = ApiState {
        store: store.clone(),
        orchestrator,
        synthesizer,
        audio,
        default_voice: config.speech.default_voice.clone(),
        default_speed: config.speech.default_speed,
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    tokio::select! {
        result = parlo_gateway::start_server(&server_config, state) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    store.close().await?;
    info!("parlo serve shutdown complete");
    Ok(())
}

/// Opens the vector store and loads the embedding model, downloading it on
/// first run.
async fn initialize_memory(
    config: &MemoryConfig,
) -> Result<Arc<ConversationMemory>, ParloError> {
    let database_path = PathBuf::from(&config.database_path);
    let data_dir = database_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let manager = ModelManager::new(data_dir);
    let model_path = manager.ensure_model().await?;
    let embedder = Arc::new(OnnxEmbedder::new(&model_path)?);

    let vector_store = VectorStore::open(&config.database_path).await?;
    let memory = ConversationMemory::new(embedder, vector_store);
    info!(
        entries = memory.count().await?,
        path = %config.database_path,
        "retrieval memory initialized"
    );
    Ok(Arc::new(memory))
}

/// Initializes the tracing subscriber.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parlo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
