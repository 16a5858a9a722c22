// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text embedding trait.

use async_trait::async_trait;

use crate::error::ParloError;

/// Produces dense vectors for similarity search over stored conversation
/// turns.
///
/// Vectors are expected to be L2-normalized so cosine similarity reduces to
/// a dot product.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Dimensionality of the vectors this embedder produces.
    fn dimensions(&self) -> usize;

    /// Embeds a single text into a dense vector of [`Self::dimensions`] length.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ParloError>;
}
