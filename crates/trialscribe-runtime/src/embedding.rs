//! Embedding providers.
//!
//! An embedding provider maps text to a fixed-dimension vector. The
//! provider is the costly, possibly-async leaf of retrieval; everything
//! downstream (storage, scoring) is pure.
//!
//! [`HashEmbedder`] is the bundled implementation: signed feature hashing
//! over lowercase words and character n-grams, L2-normalized. It is
//! deterministic, offline, and a deliberately lexical approximation —
//! model-backed providers implement the same trait.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use thiserror::Error;

use trialscribe_core::l2_norm;

/// Errors from embedding backends.
///
/// Unavailability is fatal to the calling operation; there is no retry at
/// this layer. Retry policy, if any, belongs to the caller.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),
}

/// Maps text to fixed-dimension vectors.
///
/// Implementations must be deterministic for a fixed configuration: the
/// same text always embeds to the same vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Output dimension, fixed for the provider's lifetime.
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// Deterministic signed feature-hashing embedder.
///
/// Features are lowercase alphanumeric words plus their character 3..=5
/// grams; each feature adds ±1 to a hashed bucket (the sign comes from an
/// independent hash bit, so unrelated collisions cancel in expectation).
/// The result is L2-normalized; empty text embeds to the zero vector.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSION: usize = 512;

    const MIN_GRAM: usize = 3;
    const MAX_GRAM: usize = 5;

    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn feature_vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();

        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            self.bump(&mut vector, token);

            let chars: Vec<char> = token.chars().collect();
            for n in Self::MIN_GRAM..=Self::MAX_GRAM {
                if chars.len() <= n {
                    break;
                }
                for gram in chars.windows(n) {
                    self.bump(&mut vector, &gram.iter().collect::<String>());
                }
            }
        }

        let norm = l2_norm(&vector);
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    fn bump(&self, vector: &mut [f32], feature: &str) {
        let mut hasher = DefaultHasher::new();
        feature.hash(&mut hasher);
        let hash = hasher.finish();
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.feature_vector(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use trialscribe_core::cosine_similarity;

    #[tokio::test]
    async fn embed_is_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("adverse event reporting").await.unwrap();
        let b = embedder.embed("adverse event reporting").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn embed_has_configured_dimension() {
        let embedder = HashEmbedder::new(64);
        let v = embedder.embed("some text").await.unwrap();
        assert_eq!(v.len(), 64);
    }

    #[tokio::test]
    async fn empty_text_embeds_to_zero_vector() {
        let embedder = HashEmbedder::default();
        let v = embedder.embed("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn related_text_scores_higher_than_unrelated() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed("adverse event reporting timeline").await.unwrap();
        let related = embedder
            .embed("The sponsor must report adverse events within 24 hours.")
            .await
            .unwrap();
        let unrelated = embedder
            .embed("Consent forms must state withdrawal rights.")
            .await
            .unwrap();

        assert!(
            cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated)
        );
    }

    #[tokio::test]
    async fn embed_batch_matches_individual_embeds() {
        let embedder = HashEmbedder::default();
        let texts = vec!["first".to_string(), "second".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(batch[0], embedder.embed("first").await.unwrap());
        assert_eq!(batch[1], embedder.embed("second").await.unwrap());
    }

    proptest! {
        #[test]
        fn nonempty_vectors_are_unit_norm(text in "[a-z ]{1,80}") {
            let embedder = HashEmbedder::default();
            let v = embedder.feature_vector(&text);
            let norm = trialscribe_core::l2_norm(&v);
            // Either nothing tokenized (all spaces) or unit norm.
            prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4);
        }
    }
}
