// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ONNX embedding backend for local inference using all-MiniLM-L6-v2.
//!
//! Produces 384-dimensional embeddings on CPU with zero external API calls.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use parlo_core::traits::Embedder;
use parlo_core::ParloError;

/// Embedding dimensions for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// ONNX-based embedder using all-MiniLM-L6-v2.
///
/// Loads the quantized INT8 ONNX model and tokenizer from disk.
/// All inference runs on CPU with a single thread.
pub struct OnnxEmbedder {
    /// ONNX Runtime session (not Send, wrapped in Mutex for safety).
    session: Mutex<Session>,
    /// HuggingFace tokenizer.
    tokenizer: tokenizers::Tokenizer,
}

// Safety: Session is accessed through Mutex which provides synchronization.
// The tokenizer is thread-safe for encoding operations.
unsafe impl Send for OnnxEmbedder {}
unsafe impl Sync for OnnxEmbedder {}

impl OnnxEmbedder {
    /// Creates a new ONNX embedder from model files on disk.
    ///
    /// Expects `tokenizer.json` in the same directory as the model file.
    pub fn new(model_path: &Path) -> Result<Self, ParloError> {
        let model_dir = model_path
            .parent()
            .ok_or_else(|| ParloError::Internal("Invalid model path".to_string()))?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            ParloError::Internal(format!(
                "Failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;

        let session = Session::builder()
            .map_err(|e| ParloError::Internal(format!("Failed to create ONNX session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ParloError::Internal(format!("Failed to set optimization level: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| ParloError::Internal(format!("Failed to set thread count: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| {
                ParloError::Internal(format!(
                    "Failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    /// Embed a single text string, returning an L2-normalized 384-dim vector.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, ParloError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ParloError::Internal(format!("Tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        let seq_len = input_ids.len();

        let input_ids_array =
            Array2::from_shape_vec((1, seq_len), input_ids).map_err(|e| {
                ParloError::Internal(format!("Failed to create input_ids tensor: {e}"))
            })?;
        let attention_mask_array =
            Array2::from_shape_vec((1, seq_len), attention_mask.clone()).map_err(|e| {
                ParloError::Internal(format!("Failed to create attention_mask tensor: {e}"))
            })?;
        let token_type_ids_array =
            Array2::from_shape_vec((1, seq_len), token_type_ids).map_err(|e| {
                ParloError::Internal(format!("Failed to create token_type_ids tensor: {e}"))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ParloError::Internal(format!("Failed to lock ONNX session: {e}")))?;

        let input_ids_tensor =
            TensorRef::from_array_view(&input_ids_array).map_err(|e| {
                ParloError::Internal(format!("Failed to create input_ids TensorRef: {e}"))
            })?;
        let attention_mask_tensor =
            TensorRef::from_array_view(&attention_mask_array).map_err(|e| {
                ParloError::Internal(format!("Failed to create attention_mask TensorRef: {e}"))
            })?;
        let token_type_ids_tensor =
            TensorRef::from_array_view(&token_type_ids_array).map_err(|e| {
                ParloError::Internal(format!("Failed to create token_type_ids TensorRef: {e}"))
            })?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])
            .map_err(|e| ParloError::Internal(format!("ONNX inference failed: {e}")))?;

        // Extract output: shape [1, seq_len, 384]
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ParloError::Internal(format!("Failed to extract output tensor: {e}")))?;

        // Apply attention-masked mean pooling
        let hidden_size = shape[shape.len() - 1] as usize;
        let pooled = mean_pool_with_attention(data, &attention_mask, seq_len, hidden_size);

        Ok(l2_normalize(&pooled))
    }
}

/// Apply attention-masked mean pooling over token embeddings.
fn mean_pool_with_attention(
    embeddings: &[f32],
    attention_mask: &[i64],
    seq_len: usize,
    hidden_size: usize,
) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for i in 0..seq_len {
        if attention_mask[i] > 0 {
            for j in 0..hidden_size {
                sum[j] += embeddings[i * hidden_size + j];
            }
            count += 1.0;
        }
    }

    if count > 0.0 {
        for val in &mut sum {
            *val /= count;
        }
    }

    sum
}

/// L2-normalize a vector.
fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl Embedder for OnnxEmbedder {
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ParloError> {
        self.embed_text(text)
    }
}
