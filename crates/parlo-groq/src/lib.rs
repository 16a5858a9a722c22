// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq chat-completion client.
//!
//! Groq exposes an OpenAI-compatible `/chat/completions` endpoint; this
//! crate wraps it behind the [`parlo_core::ChatProvider`] trait with Bearer
//! authentication and transient error retry.

pub mod client;
pub mod types;

pub use client::GroqClient;
