//! Candidate timestamp planning.
//!
//! Candidates are spread evenly across the middle of the video, skipping the
//! first and last 6% where fades, black frames and cut artifacts live.

use crate::error::{FramepickError, Result};

/// Fraction of the duration skipped at the start.
pub const WINDOW_START: f64 = 0.06;
/// Fraction of the duration where the usable window ends.
pub const WINDOW_END: f64 = 0.94;
/// No candidate is placed closer than this to the end of the stream.
pub const TAIL_GUARD_SECS: f64 = 0.15;
/// One candidate per this many seconds of video, before clamping.
pub const SECONDS_PER_CANDIDATE: f64 = 0.35;
pub const MIN_CANDIDATES: usize = 40;

/// Number of candidates planned for `duration`.
///
/// Grows with the duration, never drops below [`MIN_CANDIDATES`] and never exceeds
/// `max_candidates`. When `max_candidates` is itself below the floor, the cap wins.
pub fn candidate_count(duration: f64, max_candidates: usize) -> usize {
    if !duration.is_finite() || duration <= 0.0 {
        return 0;
    }
    let raw = (duration / SECONDS_PER_CANDIDATE).floor() as usize;
    raw.max(MIN_CANDIDATES).min(max_candidates)
}

/// Evenly spaced, strictly ascending candidate timestamps for a video of `duration` seconds.
///
/// Every timestamp lies strictly inside `(duration * 0.06, duration * 0.94)` and at or below
/// `duration - 0.15`. On very short clips the tail clamp folds several candidates onto the same
/// instant; duplicates are dropped, so the result may hold fewer than [`candidate_count`]
/// entries, or none at all.
pub fn plan_candidates(duration: f64, max_candidates: usize) -> Result<Vec<f64>> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(FramepickError::InvalidDuration { duration });
    }

    let start = duration * WINDOW_START;
    let end = duration * WINDOW_END;
    let span = (end - start).max(0.0);
    let count = candidate_count(duration, max_candidates);
    let step = span / (count + 1) as f64;
    let upper = (duration - TAIL_GUARD_SECS).max(0.0);

    let mut timestamps: Vec<f64> = Vec::with_capacity(count);
    for i in 1..=count {
        let t = (start + step * i as f64).clamp(0.0, upper);
        if t <= start {
            continue;
        }
        if timestamps.last().is_some_and(|&prev| t <= prev) {
            continue;
        }
        timestamps.push(t);
    }

    Ok(timestamps)
}
