// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rich configuration diagnostics.
//!
//! Figment reports deserialization failures as flat strings; this module
//! turns them into miette diagnostics that point into the offending
//! `parlo.toml`, list the keys a section accepts, and suggest a correction
//! when a key looks like a typo (`audio_dri` for `audio_dir`, `modle` for
//! `model`).

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity before a key counts as a plausible typo.
/// Below this the "did you mean" hint is more confusing than helpful.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, carrying whatever context was recoverable:
/// a source span into the TOML file, the section's accepted keys, and a
/// fuzzy-matched correction.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key no section of the configuration accepts.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(parlo::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Closest accepted key, when one is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        /// Where the key appears in the TOML source.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The TOML source, for the span rendering.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type, such as a quoted port number.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(
        code(parlo::config::invalid_type),
        help("expected {expected}")
    )]
    InvalidType {
        /// Dotted path of the key, e.g. `groq.max_tokens`.
        key: String,
        /// What was found versus what was wanted.
        detail: String,
        /// The expected type.
        expected: String,
        /// Where the value appears in the TOML source.
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        /// The TOML source, for the span rendering.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key the configuration cannot do without.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(parlo::config::missing_key),
        help("add `{key} = <value>` to your parlo.toml")
    )]
    MissingKey {
        /// The missing key name.
        key: String,
    },

    /// A well-formed value that fails a semantic check, such as a speed
    /// outside the synthesizable range.
    #[error("validation error: {message}")]
    #[diagnostic(code(parlo::config::validation))]
    Validation {
        /// Description of the failed check.
        message: String,
    },

    /// Anything figment reports that has no richer mapping.
    #[error("configuration error: {0}")]
    #[diagnostic(code(parlo::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Converts a figment error (which may bundle several failures) into one
/// `ConfigError` per failure.
///
/// `toml_sources` maps the paths of the loaded TOML files to their raw
/// content, so unknown-key errors can carry a span into the file that
/// actually defined the key.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| convert_one(e, toml_sources))
        .collect()
}

fn convert_one(
    error: figment::error::Error,
    toml_sources: &[(String, String)],
) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, accepted) => {
            let valid_keys: Vec<&str> = accepted.to_vec();
            let (span, src) = locate_key(&error, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, &valid_keys),
                valid_keys: valid_keys.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.clone().into_owned(),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: dotted_path(&error),
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.to_string(),
            span: None,
            src: None,
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

fn dotted_path(error: &figment::error::Error) -> String {
    error
        .path
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolves an unknown-key error to a span in the TOML file it came from.
///
/// Figment's metadata names the file; the key's byte offset is recovered by
/// scanning that file for the key within its section. Returns nothing when
/// the error came from the environment or the key cannot be located.
fn locate_key(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    let Some(file) = file else {
        return (None, None);
    };

    let Some((path, content)) = toml_sources
        .iter()
        .find(|(p, _)| p == &file)
        .map(|(p, c)| (p.as_str(), c.as_str()))
    else {
        return (None, None);
    };

    let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
    match key_offset(content, &section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.to_string())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` in `content`, searching after the `[section]`
/// header named by the first path segment (or from the start for top-level
/// keys). Matches only keys at the start of a line, so a key appearing
/// inside a string value is not misattributed.
fn key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut offset = start;
    for line in content[start..].lines() {
        let key = line.trim_start();
        if let Some(rest) = key.strip_prefix(field) {
            if rest.starts_with(['=', ' ', '\t']) {
                return Some(offset + (line.len() - key.len()));
            }
        }
        offset += line.len() + 1;
    }
    None
}

/// The accepted key most similar to `unknown`, when any clears the
/// similarity threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Renders every error to stderr through miette's graphical handler, falling
/// back to plain `Display` if rendering fails.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
