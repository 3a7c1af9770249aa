//! Cosine similarity and threshold ranking
//!
//! Ranking keeps every candidate strictly above the threshold. There is no top-k cutoff.

use crate::record::{Candidate, Match};

/// Compute cosine similarity between two vectors
///
/// Returns 0.0 when the lengths differ, a vector is empty, or a norm is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Score candidates against `query`, keep those with score > `threshold`, best first
///
/// The sort is stable, so equal scores keep the order the store returned them in.
pub fn rank_candidates(query: &[f32], candidates: Vec<Candidate>, threshold: f64) -> Vec<Match> {
    let mut matches: Vec<Match> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let score = cosine_similarity(query, &candidate.embedding);
            (score > threshold).then(|| Match {
                id: candidate.id,
                label: candidate.label,
                score,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}
