use crate::index::SparseVector;
use crate::model::{PageRef, RankedHit};
use std::cmp::Ordering;

/// Cosine similarity; 0 whenever either side is the zero vector.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f32 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    let score = a.dot(b) / denom;
    if score.is_finite() { score.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Score every page against the query. Sorted by score descending; equal
/// scores keep corpus order.
pub fn rank(query: &SparseVector, pages: &[SparseVector], meta: &[PageRef]) -> Vec<RankedHit> {
    debug_assert_eq!(pages.len(), meta.len());
    let mut hits: Vec<RankedHit> = pages
        .iter()
        .zip(meta)
        .map(|(vector, at)| RankedHit { score: cosine(query, vector), doc: at.doc, page: at.page })
        .collect();
    // sort_by is stable
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits
}
