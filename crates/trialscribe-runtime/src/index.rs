//! Shared, atomically replaceable vector index.
//!
//! The active [`VectorIndex`] is read-mostly shared state. Readers take a
//! consistent snapshot (an `Arc` clone) before embedding the query, so an
//! in-flight search completes against the index that was active when it
//! started even if a rebuild lands mid-query. Writers publish a whole new
//! index in one visible step; the previous one is never mutated in place.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use trialscribe_core::{Chunk, ChunkPayload, IndexError, SearchHit, VectorIndex};

use crate::embedding::{EmbeddingError, EmbeddingProvider};

/// Errors from embedding-backed retrieval.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// The process-wide retrieval index, paired with its embedding provider.
pub struct SharedIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    active: RwLock<Arc<VectorIndex>>,
}

impl SharedIndex {
    /// Create an empty index whose dimension matches the embedder's.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let empty = VectorIndex::empty(embedder.dimension());
        Self {
            embedder,
            active: RwLock::new(Arc::new(empty)),
        }
    }

    /// Embed and append chunks to the active index.
    ///
    /// Fails with [`IndexError::EmptyCorpus`] on zero inputs. The extended
    /// index replaces the active one atomically; concurrent readers keep
    /// their snapshot.
    pub async fn add_chunks(&self, payloads: Vec<ChunkPayload>) -> Result<usize, RetrievalError> {
        let chunks = self.embed_payloads(payloads).await?;
        let added = chunks.len();

        let mut active = self.active.write();
        let mut next = (**active).clone();
        next.append(chunks)?;
        *active = Arc::new(next);

        Ok(added)
    }

    /// Embed chunks into a fresh index and swap it in, discarding the old
    /// corpus entirely.
    pub async fn rebuild(&self, payloads: Vec<ChunkPayload>) -> Result<usize, RetrievalError> {
        let chunks = self.embed_payloads(payloads).await?;
        let next = VectorIndex::from_chunks(chunks)?;
        let count = next.len();

        *self.active.write() = Arc::new(next);

        tracing::info!(chunks = count, "retrieval index rebuilt");
        Ok(count)
    }

    /// Embed the query and rank it against a snapshot of the active index.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        let snapshot = self.snapshot();
        let query_vector = self.embedder.embed(query).await?;
        Ok(snapshot.rank(&query_vector, k)?)
    }

    /// A consistent snapshot of the active index.
    pub fn snapshot(&self) -> Arc<VectorIndex> {
        Arc::clone(&self.active.read())
    }

    /// Number of chunks in the active index.
    pub fn len(&self) -> usize {
        self.active.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.read().is_empty()
    }

    async fn embed_payloads(
        &self,
        payloads: Vec<ChunkPayload>,
    ) -> Result<Vec<Chunk>, RetrievalError> {
        if payloads.is_empty() {
            return Err(IndexError::EmptyCorpus.into());
        }

        let texts: Vec<String> = payloads.iter().map(|p| p.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        Ok(payloads
            .into_iter()
            .zip(vectors)
            .map(|(payload, vector)| Chunk {
                text: payload.text,
                metadata: payload.metadata,
                vector,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    fn shared_index() -> SharedIndex {
        SharedIndex::new(Arc::new(HashEmbedder::default()))
    }

    fn guidance_payloads() -> Vec<ChunkPayload> {
        vec![
            ChunkPayload::new(
                "The sponsor must report adverse events within 24 hours.",
                "guidance.txt",
                0,
            ),
            ChunkPayload::new(
                "Consent forms must state withdrawal rights.",
                "guidance.txt",
                1,
            ),
        ]
    }

    #[tokio::test]
    async fn rebuild_rejects_empty_corpus() {
        let index = shared_index();
        let result = index.rebuild(vec![]).await;
        assert!(matches!(
            result,
            Err(RetrievalError::Index(IndexError::EmptyCorpus))
        ));
    }

    #[tokio::test]
    async fn search_on_empty_index_returns_no_hits() {
        let index = shared_index();
        let hits = index.search("anything", 4).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn adverse_event_query_ranks_reporting_chunk_first() {
        let index = shared_index();
        index.rebuild(guidance_payloads()).await.unwrap();

        let hits = index
            .search("adverse event reporting timeline", 1)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert!(hits[0].text.contains("adverse events"));
        assert_eq!(hits[0].metadata.chunk_index, 0);
    }

    #[tokio::test]
    async fn rebuild_replaces_the_previous_corpus() {
        let index = shared_index();
        index.rebuild(guidance_payloads()).await.unwrap();
        index
            .rebuild(vec![ChunkPayload::new("Entirely new corpus.", "other.txt", 0)])
            .await
            .unwrap();

        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_survives_a_rebuild() {
        let index = shared_index();
        index.rebuild(guidance_payloads()).await.unwrap();

        let snapshot = index.snapshot();
        index
            .rebuild(vec![ChunkPayload::new("Replacement.", "other.txt", 0)])
            .await
            .unwrap();

        // The old snapshot still sees the original two chunks.
        assert_eq!(snapshot.len(), 2);
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn add_chunks_appends_without_discarding() {
        let index = shared_index();
        index.rebuild(guidance_payloads()).await.unwrap();
        index
            .add_chunks(vec![ChunkPayload::new("Additional guidance.", "extra.txt", 0)])
            .await
            .unwrap();

        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn add_chunks_rejects_empty_input() {
        let index = shared_index();
        assert!(index.add_chunks(vec![]).await.is_err());
    }
}
