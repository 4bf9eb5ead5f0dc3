use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

/// Root directory for materialized picks.
pub fn get_root_output_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("framepick")
}

/// Default directory for the picks of `video`, keyed by a hash of its path.
pub fn get_output_dir(video: &Path) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    video.hash(&mut hasher);
    let video_hash = hasher.finish();

    get_root_output_dir().join(video_hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_is_stable_per_video() {
        let a = get_output_dir(Path::new("/videos/a.mp4"));
        assert_eq!(a, get_output_dir(Path::new("/videos/a.mp4")));
        assert_ne!(a, get_output_dir(Path::new("/videos/b.mp4")));
        assert!(a.starts_with(get_root_output_dir()));
    }
}
