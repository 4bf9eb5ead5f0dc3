use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use framepick_core::{EdgeStats, FramepickError, LumaStats, MediaTool, Result};

type StatsFn<T> = Box<dyn Fn(f64) -> Option<T> + Send + Sync>;

/// Scripted media tool. Extracted "frames" are text files holding their timestamp, so the
/// statistics callbacks can answer per timestamp.
pub struct FakeTool {
    pub duration: Option<f64>,
    pub extract_fails: Box<dyn Fn(f64) -> bool + Send + Sync>,
    pub luma: StatsFn<LumaStats>,
    pub edge: StatsFn<EdgeStats>,
    pub extractions: Mutex<Vec<(f64, PathBuf, Option<u32>)>>,
}

impl FakeTool {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            extract_fails: Box::new(|_| false),
            luma: Box::new(|_| {
                Some(LumaStats {
                    mean: Some(128.0),
                    stdev: Some(64.0),
                })
            }),
            edge: Box::new(|_| Some(EdgeStats { mean: Some(40.0) })),
            extractions: Mutex::new(Vec::new()),
        }
    }

    pub fn extraction_log(&self) -> Vec<(f64, PathBuf, Option<u32>)> {
        self.extractions.lock().unwrap().clone()
    }
}

fn timestamp_of(image: &Path) -> Result<f64> {
    let text = std::fs::read_to_string(image)?;
    text.trim().parse().map_err(|_| FramepickError::StatsFailed {
        image_path: image.to_path_buf(),
        reason: "not a fake frame".to_string(),
    })
}

#[async_trait]
impl MediaTool for FakeTool {
    async fn probe_duration(&self, video: &Path) -> Result<f64> {
        self.duration.ok_or_else(|| FramepickError::ProbeFailed {
            video_path: video.to_path_buf(),
            reason: "moov atom not found".to_string(),
        })
    }

    async fn extract_frame(
        &self,
        video: &Path,
        timestamp: f64,
        output: &Path,
        width: Option<u32>,
    ) -> Result<()> {
        self.extractions
            .lock()
            .unwrap()
            .push((timestamp, output.to_path_buf(), width));

        if (self.extract_fails)(timestamp) {
            return Err(FramepickError::FrameExtractionFailed {
                video_path: video.to_path_buf(),
                timestamp,
                reason: "scripted failure".to_string(),
            });
        }
        std::fs::write(output, timestamp.to_string())?;
        Ok(())
    }

    async fn luma_stats(&self, image: &Path) -> Result<LumaStats> {
        let timestamp = timestamp_of(image)?;
        (self.luma)(timestamp).ok_or_else(|| FramepickError::StatsFailed {
            image_path: image.to_path_buf(),
            reason: "scripted failure".to_string(),
        })
    }

    async fn edge_stats(&self, image: &Path) -> Result<EdgeStats> {
        let timestamp = timestamp_of(image)?;
        (self.edge)(timestamp).ok_or_else(|| FramepickError::StatsFailed {
            image_path: image.to_path_buf(),
            reason: "scripted failure".to_string(),
        })
    }
}
