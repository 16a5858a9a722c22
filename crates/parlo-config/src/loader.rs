// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./parlo.toml` > `~/.config/parlo/parlo.toml` > `/etc/parlo/parlo.toml`
//! with environment variable overrides via `PARLO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ParloConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/parlo/parlo.toml` (system-wide)
/// 3. `~/.config/parlo/parlo.toml` (user XDG config)
/// 4. `./parlo.toml` (local directory)
/// 5. `PARLO_*` environment variables
pub fn load_config() -> Result<ParloConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParloConfig::default()))
        .merge(Toml::file("/etc/parlo/parlo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("parlo/parlo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("parlo.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ParloConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParloConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ParloConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParloConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ParloConfig::default()))
        .merge(Toml::file("/etc/parlo/parlo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("parlo/parlo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("parlo.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `PARLO_GROQ_API_KEY` must
/// map to `groq.api_key`, not `groq.api.key`.
fn env_provider() -> Env {
    Env::prefixed("PARLO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PARLO_GROQ_API_KEY -> "groq_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("groq_", "groq.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("speech_", "speech.", 1)
            .replacen("memory_", "memory.", 1);
        mapped.into()
    })
}
