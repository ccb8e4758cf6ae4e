//! In-memory vector index over embedded reference chunks.
//!
//! The index is the pure half of retrieval: it stores chunks whose vectors
//! were computed elsewhere and ranks them against an already-embedded query.
//! Every stored vector shares the dimension fixed at construction.
//!
//! Storage is append-only. Replacing the corpus wholesale is done by
//! building a fresh index and swapping it in at the owner's level, never by
//! mutating an index other readers may hold.

use thiserror::Error;

use crate::scoring::rank_top_k;
use crate::types::{Chunk, SearchHit};

/// Errors from index construction and querying.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Append-only store of embedded chunks with brute-force top-k ranking.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    items: Vec<Chunk>,
    dimension: usize,
}

impl VectorIndex {
    /// Create an empty index for vectors of the given dimension.
    pub fn empty(dimension: usize) -> Self {
        Self {
            items: Vec::new(),
            dimension,
        }
    }

    /// Build an index from a non-empty set of embedded chunks.
    ///
    /// The dimension is taken from the first chunk; every other chunk must
    /// agree. Duplicate texts are stored as duplicate entries.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self, IndexError> {
        let first = chunks.first().ok_or(IndexError::EmptyCorpus)?;
        let mut index = Self::empty(first.vector.len());
        index.append(chunks)?;
        Ok(index)
    }

    /// Append chunks, validating their dimension. No de-duplication.
    pub fn append(&mut self, chunks: Vec<Chunk>) -> Result<(), IndexError> {
        for chunk in &chunks {
            if chunk.vector.len() != self.dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dimension,
                    got: chunk.vector.len(),
                });
            }
        }
        self.items.extend(chunks);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Rank all stored chunks against an embedded query, returning the top
    /// `k` by descending cosine similarity (insertion order on ties).
    ///
    /// A query of the wrong dimension is a caller contract violation and is
    /// rejected rather than silently mis-scored.
    pub fn rank(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }
        Ok(rank_top_k(query, &self.items, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    fn chunk(text: &str, index: usize, vector: Vec<f32>) -> Chunk {
        Chunk {
            text: text.to_string(),
            metadata: ChunkMetadata::new("doc", index),
            vector,
        }
    }

    #[test]
    fn from_chunks_rejects_empty_corpus() {
        assert!(matches!(
            VectorIndex::from_chunks(vec![]),
            Err(IndexError::EmptyCorpus)
        ));
    }

    #[test]
    fn from_chunks_fixes_dimension_from_first() {
        let index =
            VectorIndex::from_chunks(vec![chunk("a", 0, vec![1.0, 0.0, 0.0])]).unwrap();
        assert_eq!(index.dimension(), 3);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn append_rejects_mismatched_dimension() {
        let mut index = VectorIndex::empty(2);
        let result = index.append(vec![chunk("a", 0, vec![1.0, 0.0, 0.0])]);
        assert!(matches!(
            result,
            Err(IndexError::DimensionMismatch { expected: 2, got: 3 })
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn duplicate_texts_are_kept_as_duplicates() {
        let mut index = VectorIndex::empty(2);
        index
            .append(vec![chunk("same", 0, vec![1.0, 0.0]), chunk("same", 1, vec![1.0, 0.0])])
            .unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn rank_rejects_wrong_query_dimension() {
        let index = VectorIndex::from_chunks(vec![chunk("a", 0, vec![1.0, 0.0])]).unwrap();
        assert!(index.rank(&[1.0, 0.0, 0.0], 1).is_err());
    }

    #[test]
    fn rank_on_empty_index_returns_nothing() {
        let index = VectorIndex::empty(2);
        assert!(index.rank(&[1.0, 0.0], 5).unwrap().is_empty());
    }
}
