//! Diversity-constrained top-K selection over scored candidates.

use crate::types::{Pick, ScoredCandidate};

pub const PICK_COUNT: usize = 5;
/// Lower bound of the spacing enforced on the first pass.
pub const MIN_GAP_FLOOR_SECS: f64 = 1.2;
/// The first-pass spacing grows with the video at this fraction of its duration.
pub const MIN_GAP_RATIO: f64 = 0.06;
/// Spacing used to top up the picks when the first pass comes up short.
pub const RELAXED_GAP_SECS: f64 = 1.0;

/// Spacing enforced between picks on the first pass.
pub fn min_gap(duration: f64) -> f64 {
    MIN_GAP_FLOOR_SECS.max(duration * MIN_GAP_RATIO)
}

/// Picks up to [`PICK_COUNT`] candidates. See [`select_top_k`].
pub fn select_top(duration: f64, candidates: &[ScoredCandidate]) -> Vec<Pick> {
    select_top_k(duration, candidates, PICK_COUNT)
}

/// Picks up to `k` of the best-scoring candidates, keeping them apart in time.
///
/// Candidates are ranked by descending score; equal scores keep their input order. A greedy
/// pass accepts every candidate at least [`min_gap`] away from all accepted picks. If that
/// yields fewer than `k`, a second pass over the same ranking accepts candidates at least
/// [`RELAXED_GAP_SECS`] away. The picks are returned in ascending timestamp order.
///
/// Scores are expected in `[0, 1]`; a non-finite score is ranked as 0.0.
pub fn select_top_k(duration: f64, candidates: &[ScoredCandidate], k: usize) -> Vec<Pick> {
    let mut ranked: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|c| {
            let score = if c.score.is_finite() { c.score } else { 0.0 };
            ScoredCandidate::new(c.timestamp, score)
        })
        .collect();
    // sort_by is stable, ties stay in input order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut picks: Vec<Pick> = Vec::with_capacity(k);
    greedy_pass(&ranked, min_gap(duration), k, &mut picks);
    if picks.len() < k {
        greedy_pass(&ranked, RELAXED_GAP_SECS, k, &mut picks);
    }

    picks.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    picks
}

fn greedy_pass(ranked: &[ScoredCandidate], gap: f64, k: usize, picks: &mut Vec<Pick>) {
    for candidate in ranked {
        if picks.len() >= k {
            return;
        }
        let spaced = picks
            .iter()
            .all(|pick| (pick.timestamp - candidate.timestamp).abs() >= gap);
        if spaced {
            picks.push(*candidate);
        }
    }
}
