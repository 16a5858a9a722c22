// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk audio file storage.
//!
//! Synthesized replies live directly under the audio root; uploaded voice
//! messages go in a `user/` subdirectory. Filenames are validated before
//! touching the filesystem so a crafted name can never escape the root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parlo_core::ParloError;
use tracing::debug;

/// Subdirectory for uploaded voice-input files.
const USER_SUBDIR: &str = "user";

/// Owns the audio directory tree and all reads/writes/deletes within it.
#[derive(Debug, Clone)]
pub struct AudioStore {
    root: Arc<PathBuf>,
}

impl AudioStore {
    /// Opens (and creates if needed) the audio root and its `user/`
    /// subdirectory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ParloError> {
        let root = root.into();
        std::fs::create_dir_all(root.join(USER_SUBDIR))
            .map_err(|e| ParloError::Internal(format!("failed to create audio directory: {e}")))?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a synthesized file under the root and returns its full path.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ParloError> {
        validate_filename(filename)?;
        let path = self.root.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ParloError::Internal(format!("failed to write audio file: {e}")))?;
        debug!(filename, size = bytes.len(), "audio file written");
        Ok(path)
    }

    /// Writes an uploaded voice-input file under `user/`.
    pub async fn save_user(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ParloError> {
        validate_filename(filename)?;
        let path = self.root.join(USER_SUBDIR).join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ParloError::Internal(format!("failed to write audio file: {e}")))?;
        debug!(filename, size = bytes.len(), "user audio file written");
        Ok(path)
    }

    /// Full path of a synthesized file, or `None` if it does not exist.
    pub async fn resolve(&self, filename: &str) -> Result<Option<PathBuf>, ParloError> {
        validate_filename(filename)?;
        let path = self.root.join(filename);
        Ok(tokio::fs::try_exists(&path)
            .await
            .unwrap_or(false)
            .then_some(path))
    }

    /// Full path of an uploaded file under `user/`, or `None` if missing.
    pub async fn resolve_user(&self, filename: &str) -> Result<Option<PathBuf>, ParloError> {
        validate_filename(filename)?;
        let path = self.root.join(USER_SUBDIR).join(filename);
        Ok(tokio::fs::try_exists(&path)
            .await
            .unwrap_or(false)
            .then_some(path))
    }

    /// Deletes a synthesized file. Returns false when the file is absent;
    /// missing files are never an error.
    pub async fn delete(&self, filename: &str) -> Result<bool, ParloError> {
        validate_filename(filename)?;
        let path = self.root.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(filename, "audio file deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ParloError::Internal(format!(
                "failed to delete audio file: {e}"
            ))),
        }
    }
}

/// Rejects names that are empty or could traverse out of the audio root.
pub fn validate_filename(filename: &str) -> Result<(), ParloError> {
    let safe = !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
        && !filename.starts_with('.');
    if safe {
        Ok(())
    } else {
        Err(ParloError::Validation("Invalid filename".into()))
    }
}

/// Media type for a filename by extension. Unknown extensions fall back to
/// `audio/mpeg`.
pub fn media_type(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("opus") => "audio/opus",
        Some("aac") => "audio/aac",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        _ => "audio/mpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, AudioStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AudioStore::new(dir.path().join("audio")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn new_creates_root_and_user_subdir() {
        let (_dir, store) = store();
        assert!(store.root().is_dir());
        assert!(store.root().join("user").is_dir());
    }

    #[tokio::test]
    async fn save_and_resolve_roundtrip() {
        let (_dir, store) = store();
        store.save("reply.mp3", b"bytes").await.unwrap();
        let path = store.resolve("reply.mp3").await.unwrap().unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"bytes");
        assert!(store.resolve("missing.mp3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn user_files_live_in_subdirectory() {
        let (_dir, store) = store();
        let path = store.save_user("input.wav", b"pcm").await.unwrap();
        assert!(path.ends_with("user/input.wav"));
        assert!(store.resolve_user("input.wav").await.unwrap().is_some());
        // Not visible from the synthesized-file namespace.
        assert!(store.resolve("input.wav").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_file_is_false_not_error() {
        let (_dir, store) = store();
        assert!(!store.delete("ghost.mp3").await.unwrap());
        store.save("real.mp3", b"x").await.unwrap();
        assert!(store.delete("real.mp3").await.unwrap());
        assert!(!store.delete("real.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let (_dir, store) = store();
        for name in ["../etc/passwd", "a/b.mp3", "..", ".hidden", "", "a\\b"] {
            let err = store.resolve(name).await.unwrap_err();
            assert!(matches!(err, ParloError::Validation(_)), "name: {name:?}");
        }
    }

    #[test]
    fn media_types_by_extension() {
        assert_eq!(media_type("a.mp3"), "audio/mpeg");
        assert_eq!(media_type("a.opus"), "audio/opus");
        assert_eq!(media_type("a.aac"), "audio/aac");
        assert_eq!(media_type("a.flac"), "audio/flac");
        assert_eq!(media_type("a.wav"), "audio/wav");
        assert_eq!(media_type("a.unknown"), "audio/mpeg");
        assert_eq!(media_type("noext"), "audio/mpeg");
    }
}
