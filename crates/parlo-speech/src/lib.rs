// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech synthesis for the Parlo backend.
//!
//! [`GoogleTranslateTts`] renders text to mp3 through the Google Translate
//! TTS endpoint; [`AudioStore`] owns the on-disk audio directory and the
//! filename hygiene around it.

pub mod audio_store;
pub mod tts;

pub use audio_store::AudioStore;
pub use tts::GoogleTranslateTts;
