// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and bounded numeric ranges.

use crate::diagnostic::ConfigError;
use crate::model::ParloConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParloConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate host is not empty
    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    // Validate host looks like a valid IP or hostname
    if !config.server.host.trim().is_empty() {
        let addr = config.server.host.trim();
        // Accept valid IPv4, IPv6, or hostname patterns
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{addr}` is not a valid IP address or hostname"),
            });
        }
    }

    // Validate log level is a known filter level
    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.server.log_level
            ),
        });
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate memory store path is not empty
    if config.memory.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "memory.database_path must not be empty".to_string(),
        });
    }

    if config.memory.max_results == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.max_results must be at least 1".to_string(),
        });
    }

    // Validate audio directory is not empty
    if config.speech.audio_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "speech.audio_dir must not be empty".to_string(),
        });
    }

    // Validate default speed is within the range accepted per request
    if !parlo_core::types::SPEED_RANGE.contains(&config.speech.default_speed) {
        errors.push(ConfigError::Validation {
            message: format!(
                "speech.default_speed must be between {} and {}, got {}",
                parlo_core::types::SPEED_RANGE.start(),
                parlo_core::types::SPEED_RANGE.end(),
                config.speech.default_speed
            ),
        });
    }

    // Validate generation bounds
    if config.groq.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "groq.max_tokens must be at least 1".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.groq.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "groq.temperature must be between 0.0 and 2.0, got {}",
                config.groq.temperature
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
