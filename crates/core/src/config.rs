use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_MAX_CANDIDATES: usize = 180;
pub const DEFAULT_PICK_COUNT: usize = 5;
pub const DEFAULT_SCORING_WIDTH: u32 = 320;
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs for one selection run and for the ffmpeg adapter.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub max_candidates: usize,
    pub pick_count: usize,
    /// Candidates are downscaled to this width before scoring. `None` keeps the source size.
    pub scoring_width: Option<u32>,
    pub tool_timeout: Duration,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            pick_count: DEFAULT_PICK_COUNT,
            scoring_width: Some(DEFAULT_SCORING_WIDTH),
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }
}

impl SelectionConfig {
    /// Defaults overridden by `FRAMEPICK_*` environment variables.
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ffmpeg_path: env::var_os("FRAMEPICK_FFMPEG")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: env::var_os("FRAMEPICK_FFPROBE")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffprobe_path),
            max_candidates: parse_var("FRAMEPICK_MAX_CANDIDATES")
                .unwrap_or(defaults.max_candidates),
            pick_count: parse_var("FRAMEPICK_PICKS").unwrap_or(defaults.pick_count),
            scoring_width: match parse_var::<u32>("FRAMEPICK_SCORING_WIDTH") {
                Some(0) => None,
                Some(width) => Some(width),
                None => defaults.scoring_width,
            },
            tool_timeout: parse_var("FRAMEPICK_TOOL_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.tool_timeout),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}
