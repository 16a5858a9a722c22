// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits.
//!
//! Request handlers never construct their upstream clients; they receive
//! them as `Arc<dyn Trait>` so tests can substitute deterministic fakes.

pub mod embedding;
pub mod provider;
pub mod speech;

pub use embedding::Embedder;
pub use provider::ChatProvider;
pub use speech::SpeechSynthesizer;
