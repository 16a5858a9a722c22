// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and server startup.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use parlo_core::{ParloError, SpeechSynthesizer};
use parlo_orchestrator::Orchestrator;
use parlo_speech::AudioStore;
use parlo_storage::SqliteStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{audio, chat, history, meta};

/// Shared state for axum request handlers.
///
/// All collaborators are injected; no handler constructs its own client or
/// touches global state.
#[derive(Clone)]
pub struct ApiState {
    /// Relational store for sessions and turns.
    pub store: Arc<SqliteStore>,
    /// Chat orchestrator (transcripts, retrieval, LLM).
    pub orchestrator: Arc<Orchestrator>,
    /// Text-to-speech backend.
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    /// Audio file storage.
    pub audio: Arc<AudioStore>,
    /// Accent used when a request does not pick one.
    pub default_voice: String,
    /// Playback speed used when a request does not pick one.
    pub default_speed: f32,
}

/// Server bind configuration (mirrors `ServerConfig` from parlo-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the full application router.
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/api/chat/message", post(chat::post_chat_message))
        .route("/api/chat/voice", post(chat::post_chat_voice))
        .route("/api/audio/synthesize", post(audio::post_synthesize))
        .route(
            "/api/audio/{filename}",
            get(audio::get_audio).delete(audio::delete_audio),
        )
        .route(
            "/api/history/sessions",
            post(history::post_session).get(history::list_sessions),
        )
        .route(
            "/api/history/sessions/{id}",
            get(history::get_session).delete(history::delete_session),
        )
        .route(
            "/api/history/conversations",
            post(history::post_conversation),
        )
        .route(
            "/api/history/conversations/{id}",
            get(history::get_conversation).delete(history::delete_conversation),
        );

    let public_routes = Router::new()
        .route("/", get(meta::get_root))
        .route("/health", get(meta::get_health))
        .route("/audio/{filename}", get(audio::get_audio))
        .route("/audio/user/{filename}", get(audio::get_user_audio));

    Router::new()
        .merge(api_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener and serves requests until the process exits.
pub async fn start_server(config: &ServerConfig, state: ApiState) -> Result<(), ParloError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ParloError::Channel {
            message: format!("failed to bind API server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("API server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ParloError::Channel {
            message: format!("API server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
