//! Framepick Core Library
//!
//! Picks the best still frames of a video for thumbnails: plans candidate timestamps,
//! scores each extracted frame from grayscale signal statistics and selects a
//! temporally spread top-K.

pub mod config;
pub mod error;
pub mod format;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod planner;
pub mod scorer;
pub mod scratch;
pub mod selector;
pub mod types;

// Re-export commonly used items at crate root
pub use config::SelectionConfig;
pub use error::{FramepickError, Result};
pub use format::{format_selection_readable, format_timestamp, pick_file_name};
pub use media::{Ffmpeg, MediaTool};
pub use output::{get_output_dir, get_root_output_dir};
pub use pipeline::{materialize_picks, select_best_frames, select_best_frames_with_scratch};
pub use planner::{candidate_count, plan_candidates};
pub use scorer::{FrameQuality, assess_frame, score_frame};
pub use scratch::ScratchDir;
pub use selector::{min_gap, select_top, select_top_k};
pub use types::{EdgeStats, LumaStats, Pick, ScoredCandidate, Selection};
