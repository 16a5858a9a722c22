// SPDX-FileCopyrightText: 2026 Parlo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector codec and similarity helpers.

/// A stored corpus entry, scored against a query.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// Vector-store key, `{session_id}_{n}`.
    pub key: String,
    /// The stored turn text (`User: …\nAI: …`).
    pub content: String,
    /// Cosine similarity against the query vector.
    pub score: f32,
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Compute cosine similarity between two vectors.
///
/// For L2-normalized vectors (as output by sentence transformers),
/// this is equivalent to the dot product.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn vec_to_blob_roundtrip() {
        let original = vec![0.1_f32, 0.2, 0.3, -0.5, 1.0];
        let blob = vec_to_blob(&original);
        let recovered = blob_to_vec(&blob);
        assert_eq!(original.len(), recovered.len());
        for (a, b) in original.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn vec_to_blob_384_dim() {
        let vec384: Vec<f32> = (0..384).map(|i| i as f32 / 384.0).collect();
        let blob = vec_to_blob(&vec384);
        assert_eq!(blob.len(), 384 * 4);
        let recovered = blob_to_vec(&blob);
        assert_eq!(recovered.len(), 384);
    }

    #[test]
    fn cosine_similarity_identical_normalized() {
        let v: Vec<f32> = vec![0.5773, 0.5773, 0.5773];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 0.01, "got {sim}");
    }

    #[test]
    fn cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn blob_codec_roundtrips_any_finite_vector(
            vec in proptest::collection::vec(-1.0e6_f32..1.0e6, 0..512)
        ) {
            let blob = vec_to_blob(&vec);
            prop_assert_eq!(blob.len(), vec.len() * 4);
            let recovered = blob_to_vec(&blob);
            prop_assert_eq!(vec, recovered);
        }
    }
}
