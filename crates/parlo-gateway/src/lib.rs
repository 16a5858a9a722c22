// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for the Parlo backend.
//!
//! The gateway exposes chat, audio, and history routes over axum. All
//! collaborators (store, orchestrator, synthesizer, audio store) are
//! injected through [`server::ApiState`] so tests can substitute fakes.

pub mod error;
pub mod handlers;
pub mod server;
pub mod session;

pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, start_server, ApiState, ServerConfig};
