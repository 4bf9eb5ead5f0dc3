use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{
    config::SelectionConfig,
    error::{FramepickError, Result},
    format::pick_file_name,
    media::MediaTool,
    planner::plan_candidates,
    scorer::score_frame,
    scratch::ScratchDir,
    selector::select_top_k,
    types::{Pick, ScoredCandidate, Selection},
};

/// Probe, plan, score and select the best frames of `video`.
///
/// Candidate frames go to a fresh scratch directory under the system temp dir, which is gone
/// again by the time this returns.
pub async fn select_best_frames<T: MediaTool + ?Sized>(
    tool: &T,
    video: &Path,
    config: &SelectionConfig,
) -> Result<Selection> {
    let scratch = ScratchDir::new()?;
    select_best_frames_with_scratch(tool, video, config, scratch).await
}

/// Same as [`select_best_frames`] with a caller-provided scratch directory.
/// The directory is consumed and removed when the run ends.
pub async fn select_best_frames_with_scratch<T: MediaTool + ?Sized>(
    tool: &T,
    video: &Path,
    config: &SelectionConfig,
    scratch: ScratchDir,
) -> Result<Selection> {
    let span = info_span!(
        "selection",
        run_id = %scratch.run_id(),
        video = %video.display()
    );
    run_selection(tool, video, config, &scratch)
        .instrument(span)
        .await
}

async fn run_selection<T: MediaTool + ?Sized>(
    tool: &T,
    video: &Path,
    config: &SelectionConfig,
    scratch: &ScratchDir,
) -> Result<Selection> {
    let duration = tool.probe_duration(video).await?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(FramepickError::InvalidDuration { duration });
    }

    let timestamps = plan_candidates(duration, config.max_candidates)?;
    info!(duration, candidates = timestamps.len(), "planned candidates");

    let scored = score_candidates(tool, video, &timestamps, config.scoring_width, scratch).await;
    let picks = select_top_k(duration, &scored, config.pick_count);
    info!(
        scored = scored.len(),
        picks = picks.len(),
        "selection finished"
    );

    Ok(Selection { duration, picks })
}

/// Extracts and scores every candidate in order. Candidates whose frame cannot be
/// extracted are left out.
async fn score_candidates<T: MediaTool + ?Sized>(
    tool: &T,
    video: &Path,
    timestamps: &[f64],
    width: Option<u32>,
    scratch: &ScratchDir,
) -> Vec<ScoredCandidate> {
    let mut scored = Vec::with_capacity(timestamps.len());

    for (index, &timestamp) in timestamps.iter().enumerate() {
        let frame_path = scratch.candidate_path(index + 1);
        if let Err(e) = tool
            .extract_frame(video, timestamp, &frame_path, width)
            .await
        {
            warn!(timestamp, error = %e, "skipping candidate");
            continue;
        }

        let score = score_frame(tool, &frame_path).await;
        debug!(timestamp, score, "scored candidate");
        scored.push(ScoredCandidate::new(timestamp, score));
    }

    scored
}

/// Writes full-size JPEGs of `picks` into `out_dir` as `frame_01.jpg`, `frame_02.jpg`, ...
/// in the order given. Frames left in `out_dir` by an earlier run are removed first.
/// Any failed extraction fails the whole call.
pub async fn materialize_picks<T: MediaTool + ?Sized>(
    tool: &T,
    video: &Path,
    picks: &[Pick],
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).await?;
    clear_previous_picks(out_dir).await?;

    let mut paths = Vec::with_capacity(picks.len());
    for (index, pick) in picks.iter().enumerate() {
        let path = out_dir.join(pick_file_name(index));
        tool.extract_frame(video, pick.timestamp, &path, None)
            .await?;
        paths.push(path);
    }

    info!(count = paths.len(), out_dir = %out_dir.display(), "picks written");
    Ok(paths)
}

/// Removes `frame_NN.jpg` files so a run with fewer picks does not leave older ones behind.
async fn clear_previous_picks(out_dir: &Path) -> Result<()> {
    let mut entries = fs::read_dir(out_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_pick_file_name(name) && entry.file_type().await?.is_file() {
            debug!(file = name, "removing previous pick");
            fs::remove_file(entry.path()).await?;
        }
    }
    Ok(())
}

fn is_pick_file_name(name: &str) -> bool {
    name.strip_prefix("frame_")
        .and_then(|rest| rest.strip_suffix(".jpg"))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_pick_file_names() {
        assert!(is_pick_file_name("frame_01.jpg"));
        assert!(is_pick_file_name(&pick_file_name(11)));
        assert!(!is_pick_file_name("frame_.jpg"));
        assert!(!is_pick_file_name("frame_01.png"));
        assert!(!is_pick_file_name("frame_cover.jpg"));
        assert!(!is_pick_file_name("poster.jpg"));
    }
}
