// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval memory for the Parlo backend.
//!
//! Chat turns are embedded locally with all-MiniLM-L6-v2 (ONNX, CPU) and
//! stored as BLOB vectors in a dedicated SQLite file. Augmented prompts
//! draw the top-k most similar prior turns from the whole corpus.
//!
//! ## Architecture
//!
//! - **OnnxEmbedder**: local ONNX model for 384-dim embedding inference
//! - **ModelManager**: first-run model download from HuggingFace
//! - **VectorStore**: SQLite persistence with BLOB vectors and cosine scan
//! - **ConversationMemory**: remember/recall facade used by the orchestrator

pub mod embedder;
pub mod memory;
pub mod model_manager;
pub mod store;
pub mod types;

pub use embedder::OnnxEmbedder;
pub use memory::ConversationMemory;
pub use model_manager::ModelManager;
pub use store::VectorStore;
