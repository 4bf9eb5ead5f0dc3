use std::{path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FramepickError {
    #[error("Invalid video duration: {duration}")]
    InvalidDuration { duration: f64 },

    #[error("Duration probe failed for {video_path}: {reason}")]
    ProbeFailed { video_path: PathBuf, reason: String },

    #[error("Could not parse duration for {video_path} from {raw:?}")]
    DurationParse { video_path: PathBuf, raw: String },

    #[error("Frame extraction at {timestamp:.3}s failed for {video_path}: {reason}")]
    FrameExtractionFailed {
        video_path: PathBuf,
        timestamp: f64,
        reason: String,
    },

    #[error("Image statistics failed for {image_path}: {reason}")]
    StatsFailed { image_path: PathBuf, reason: String },

    #[error("{tool} did not finish within {timeout:?}")]
    ToolTimeout { tool: String, timeout: Duration },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FramepickError>;
