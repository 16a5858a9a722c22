// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Parlo backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Parlo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParloConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Groq chat-completion API settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Conversation storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Speech synthesis and audio storage settings.
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Retrieval memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the server to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Groq chat-completion API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// Groq API key. `None` requires the `PARLO_GROQ_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for chat completions.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0-2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

/// Conversation storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("parlo").join("parlo.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("parlo.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Speech synthesis and audio storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// Directory where synthesized and uploaded audio files are stored.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,

    /// Default accent selector when a request does not supply one.
    #[serde(default = "default_voice")]
    pub default_voice: String,

    /// Default playback speed when a request does not supply one.
    #[serde(default = "default_speed")]
    pub default_speed: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            default_voice: default_voice(),
            default_speed: default_speed(),
        }
    }
}

fn default_audio_dir() -> String {
    "./audio_files".to_string()
}

fn default_voice() -> String {
    "com".to_string()
}

fn default_speed() -> f32 {
    1.0
}

/// Retrieval memory configuration.
///
/// Controls the local vector store used to augment chat prompts with
/// similar prior turns.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Enable the retrieval memory. When false, chat turns are never
    /// embedded and `use_rag` requests receive no context.
    #[serde(default = "default_memory_enabled")]
    pub enabled: bool,

    /// Path to the vector store SQLite file. The embedding model is cached
    /// next to it.
    #[serde(default = "default_memory_database_path")]
    pub database_path: String,

    /// Number of similar turns retrieved per augmented prompt.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_memory_enabled(),
            database_path: default_memory_database_path(),
            max_results: default_max_results(),
        }
    }
}

fn default_memory_enabled() -> bool {
    true
}

fn default_memory_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("parlo").join("memory.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("memory.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_max_results() -> usize {
    3
}
