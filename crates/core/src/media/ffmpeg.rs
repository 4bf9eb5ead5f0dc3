use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Output,
    time::Duration,
};

use async_trait::async_trait;
use tokio::{process::Command, time::timeout};

use crate::{
    config::SelectionConfig,
    error::{FramepickError, Result},
    media::{MediaTool, diagnostics},
    types::{EdgeStats, LumaStats},
};

const LUMA_FILTER: &str = "format=gray,showinfo";
const EDGE_FILTER: &str = "format=gray,edgedetect,showinfo";

/// [`MediaTool`] backed by the `ffmpeg` and `ffprobe` binaries.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
    timeout: Duration,
}

impl Ffmpeg {
    pub fn new(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            timeout: crate::config::DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(&config.ffmpeg_path, &config.ffprobe_path).with_timeout(config.tool_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs `program` to completion, killing it once the timeout elapses.
    async fn run<I, S>(&self, program: &Path, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);

        match timeout(self.timeout, command.output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(FramepickError::ToolTimeout {
                tool: program.display().to_string(),
                timeout: self.timeout,
            }),
        }
    }

    /// Decodes `image` through `filter` into the null muxer and returns the diagnostic text.
    async fn filter_diagnostics(&self, image: &Path, filter: &str) -> Result<String> {
        let output = self
            .run(
                &self.ffmpeg_path,
                [
                    OsStr::new("-hide_banner"),
                    OsStr::new("-nostats"),
                    OsStr::new("-i"),
                    image.as_os_str(),
                    OsStr::new("-vf"),
                    OsStr::new(filter),
                    OsStr::new("-frames:v"),
                    OsStr::new("1"),
                    OsStr::new("-f"),
                    OsStr::new("null"),
                    OsStr::new("-"),
                ],
            )
            .await?;

        if !output.status.success() {
            return Err(FramepickError::StatsFailed {
                image_path: image.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // showinfo logs to stderr
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::from_config(&SelectionConfig::default())
    }
}

#[async_trait]
impl MediaTool for Ffmpeg {
    async fn probe_duration(&self, video: &Path) -> Result<f64> {
        let output = self
            .run(
                &self.ffprobe_path,
                [
                    OsStr::new("-v"),
                    OsStr::new("error"),
                    OsStr::new("-show_entries"),
                    OsStr::new("format=duration"),
                    OsStr::new("-of"),
                    OsStr::new("default=noprint_wrappers=1:nokey=1"),
                    video.as_os_str(),
                ],
            )
            .await?;

        if !output.status.success() {
            return Err(FramepickError::ProbeFailed {
                video_path: video.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_duration(video, &stdout)
    }

    async fn extract_frame(
        &self,
        video: &Path,
        timestamp: f64,
        output_path: &Path,
        width: Option<u32>,
    ) -> Result<()> {
        let seek = format!("{:.3}", timestamp);
        let mut args: Vec<&OsStr> = vec![
            OsStr::new("-y"),
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-ss"),
            OsStr::new(&seek),
            OsStr::new("-i"),
            video.as_os_str(),
            OsStr::new("-frames:v"),
            OsStr::new("1"),
        ];

        let scale = width.map(|w| format!("scale={}:-2", w));
        if let Some(scale) = &scale {
            args.push(OsStr::new("-vf"));
            args.push(OsStr::new(scale));
        }
        args.extend([OsStr::new("-q:v"), OsStr::new("2"), output_path.as_os_str()]);

        // a leftover file from an earlier run must not pass the written check below
        remove_stale(output_path).await?;

        let output = self.run(&self.ffmpeg_path, args).await?;

        if !output.status.success() {
            return Err(FramepickError::FrameExtractionFailed {
                video_path: video.to_path_buf(),
                timestamp,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // ffmpeg exits cleanly without writing anything when seeking past the last frame
        let written = tokio::fs::metadata(output_path)
            .await
            .map(|meta| meta.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(FramepickError::FrameExtractionFailed {
                video_path: video.to_path_buf(),
                timestamp,
                reason: "no frame was written".to_string(),
            });
        }

        Ok(())
    }

    async fn luma_stats(&self, image: &Path) -> Result<LumaStats> {
        let text = self.filter_diagnostics(image, LUMA_FILTER).await?;
        diagnostics::luma_stats(&text).ok_or_else(|| FramepickError::StatsFailed {
            image_path: image.to_path_buf(),
            reason: "no luminance statistics in tool output".to_string(),
        })
    }

    async fn edge_stats(&self, image: &Path) -> Result<EdgeStats> {
        let text = self.filter_diagnostics(image, EDGE_FILTER).await?;
        diagnostics::edge_stats(&text).ok_or_else(|| FramepickError::StatsFailed {
            image_path: image.to_path_buf(),
            reason: "no edge statistics in tool output".to_string(),
        })
    }
}

async fn remove_stale(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn parse_duration(video: &Path, stdout: &str) -> Result<f64> {
    let raw = stdout.trim();
    raw.lines()
        .next()
        .and_then(|line| line.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite())
        .ok_or_else(|| FramepickError::DurationParse {
            video_path: video.to_path_buf(),
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_duration() {
        let d = parse_duration(Path::new("a.mp4"), "60.040000\n").unwrap();
        assert!((d - 60.04).abs() < 1e-9);
    }

    #[test]
    fn rejects_missing_duration() {
        for raw in ["", "N/A\n", "inf"] {
            assert!(matches!(
                parse_duration(Path::new("a.mp4"), raw),
                Err(FramepickError::DurationParse { .. })
            ));
        }
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_tool_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let sleeper = write_script(dir.path(), "ffprobe", "sleep 5");
        let tool = Ffmpeg::new("ffmpeg", &sleeper).with_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let result = tool.probe_duration(Path::new("video.mp4")).await;

        assert!(matches!(result, Err(FramepickError::ToolTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn clean_exit_without_output_is_an_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let silent = write_script(dir.path(), "ffmpeg", "exit 0");
        let tool = Ffmpeg::new(&silent, "ffprobe");

        let output = dir.path().join("frame_01.jpg");
        let result = tool
            .extract_frame(Path::new("video.mp4"), 12.0, &output, None)
            .await;

        assert!(matches!(
            result,
            Err(FramepickError::FrameExtractionFailed { timestamp, .. }) if timestamp == 12.0
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn frame_left_by_earlier_run_does_not_count_as_written() {
        let dir = tempfile::tempdir().unwrap();
        let silent = write_script(dir.path(), "ffmpeg", "exit 0");
        let tool = Ffmpeg::new(&silent, "ffprobe");

        let output = dir.path().join("frame_01.jpg");
        std::fs::write(&output, b"jpeg from an earlier run").unwrap();
        let result = tool
            .extract_frame(Path::new("video.mp4"), 3.5, &output, Some(320))
            .await;

        assert!(matches!(
            result,
            Err(FramepickError::FrameExtractionFailed { .. })
        ));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn missing_binary_is_an_io_error() {
        let tool = Ffmpeg::new(
            "/nonexistent/framepick-ffmpeg",
            "/nonexistent/framepick-ffprobe",
        );
        let result = tool.probe_duration(Path::new("video.mp4")).await;
        assert!(matches!(result, Err(FramepickError::IoError(_))));
    }
}
