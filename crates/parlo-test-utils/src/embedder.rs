// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic embedder for tests, no model download required.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use parlo_core::traits::Embedder;
use parlo_core::ParloError;

const DIMENSIONS: usize = 32;

/// Hash-based bag-of-words embedder.
///
/// Each lowercased whitespace token is hashed into one of [`DIMENSIONS`]
/// buckets and the vector is L2-normalized. Texts sharing words get high
/// cosine similarity, which is all retrieval tests need.
pub struct DeterministicEmbedder;

#[async_trait]
impl Embedder for DeterministicEmbedder {
    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ParloError> {
        let mut v = vec![0.0f32; DIMENSIONS];
        for token in text.to_lowercase().split_whitespace() {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric());
            if token.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            v[(hasher.finish() % DIMENSIONS as u64) as usize] += 1.0;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }
}
