//! Similarity scoring and top-k ranking over embedded chunks.

use crate::types::{Chunk, SearchHit};

/// Guard against division by zero when either vector has zero norm.
pub const NORM_EPSILON: f32 = 1e-8;

/// L2 (Euclidean) norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity: `dot(a, b) / (||a|| * ||b|| + epsilon)`.
///
/// The epsilon keeps the score finite for zero vectors, which then score
/// 0.0 against everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have equal dimensions");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (l2_norm(a) * l2_norm(b) + NORM_EPSILON)
}

/// Rank chunks by descending cosine similarity to the query vector and
/// return the top `k` as [`SearchHit`]s.
///
/// Ties are broken by insertion order (earlier chunk ranks higher); the
/// stable sort preserves that for equal scores. Linear in the number of
/// chunks per query.
pub fn rank_top_k(query: &[f32], chunks: &[Chunk], k: usize) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = chunks
        .iter()
        .map(|chunk| SearchHit {
            text: chunk.text.clone(),
            metadata: chunk.metadata.clone(),
            score: cosine_similarity(query, &chunk.vector),
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(k);
    hits
}
