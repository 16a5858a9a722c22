// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat orchestration.
//!
//! The [`Orchestrator`] owns per-session transcripts, optionally augments
//! prompts with similarity-retrieved prior turns, calls the configured
//! [`parlo_core::ChatProvider`], and writes completed exchanges back into
//! retrieval memory.

pub mod orchestrator;

pub use orchestrator::{ChatOutcome, Orchestrator};
