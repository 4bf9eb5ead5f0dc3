//! Seams to the external media tool.
//!
//! The algorithmic core only sees [`MediaTool`]; everything that knows about
//! command lines and diagnostic output lives in the submodules.

pub mod diagnostics;
pub mod ffmpeg;

use std::path::Path;

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{EdgeStats, LumaStats},
};

pub use ffmpeg::Ffmpeg;

#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Total duration of `video` in seconds.
    async fn probe_duration(&self, video: &Path) -> Result<f64>;

    /// Writes the frame nearest to `timestamp` as a JPEG at `output`.
    /// With `width` set the frame is downscaled, keeping the aspect ratio.
    async fn extract_frame(
        &self,
        video: &Path,
        timestamp: f64,
        output: &Path,
        width: Option<u32>,
    ) -> Result<()>;

    /// Grayscale luminance mean and standard deviation of an image.
    async fn luma_stats(&self, image: &Path) -> Result<LumaStats>;

    /// Grayscale statistics of an image after edge detection.
    async fn edge_stats(&self, image: &Path) -> Result<EdgeStats>;
}
