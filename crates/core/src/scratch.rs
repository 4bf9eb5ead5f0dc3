use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use crate::error::Result;

/// Per-run scratch directory for extracted candidate frames.
///
/// Owned by exactly one selection run and removed when dropped, whichever way the run ends.
#[derive(Debug)]
pub struct ScratchDir {
    run_id: Uuid,
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> Result<Self> {
        Self::new_in(std::env::temp_dir())
    }

    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        let run_id = Uuid::new_v4();
        let dir = tempfile::Builder::new()
            .prefix(&format!("framepick-{}-", run_id))
            .tempdir_in(parent)?;
        Ok(Self { run_id, dir })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for the `index`-th candidate frame.
    pub fn candidate_path(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("candidate_{:04}.jpg", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_on_drop() {
        let scratch = ScratchDir::new().unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::write(scratch.candidate_path(1), b"jpeg").unwrap();
        assert!(path.exists());

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn names_carry_run_id_and_index() {
        let scratch = ScratchDir::new().unwrap();
        let name = scratch.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(&format!("framepick-{}-", scratch.run_id())));
        assert!(scratch.candidate_path(7).ends_with("candidate_0007.jpg"));
    }
}
