//! Embedding memoization.
//!
//! Embeddings are deterministic per text, so caching them is transparent.
//! The cache sits in front of any [`EmbeddingProvider`] and pays off when
//! the same query or corpus text is embedded repeatedly across jobs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::embedding::{EmbeddingError, EmbeddingProvider};

/// An [`EmbeddingProvider`] wrapper that memoizes per distinct text.
pub struct CachedEmbedder<P> {
    inner: P,
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl<P: EmbeddingProvider> CachedEmbedder<P> {
    /// Wrap a provider with the given capacity and entry TTL.
    pub fn new(inner: P, max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    /// Wrap a provider with defaults sized for a single-process corpus.
    pub fn with_defaults(inner: P) -> Self {
        Self::new(inner, 10_000, Duration::from_secs(3600))
    }

    /// Number of cached embeddings.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CachedEmbedder<P> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if let Some(vector) = self.cache.get(text).await {
            return Ok((*vector).clone());
        }

        let vector = self.inner.embed(text).await?;
        self.cache
            .insert(text.to_string(), Arc::new(vector.clone()))
            .await;
        Ok(vector)
    }
}
