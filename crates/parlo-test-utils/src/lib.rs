// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parlo integration tests.
//!
//! Provides mock collaborators and a full-stack test harness for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockChatProvider`] - chat provider with pre-configured responses
//! - [`MockSynthesizer`] - synthesizer that writes real files, no network
//! - [`DeterministicEmbedder`] - hash-based embedder, no model download
//! - [`TestHarness`] - temp storage + mocks + a live API server

pub mod embedder;
pub mod harness;
pub mod mock_provider;
pub mod mock_synthesizer;

pub use embedder::DeterministicEmbedder;
pub use harness::TestHarness;
pub use mock_provider::MockChatProvider;
pub use mock_synthesizer::MockSynthesizer;
