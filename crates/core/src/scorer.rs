//! Heuristic frame quality from grayscale signal statistics.

use std::path::Path;

use tracing::{debug, warn};

use crate::{
    media::MediaTool,
    types::{EdgeStats, LumaStats},
};

pub const EXPOSURE_WEIGHT: f64 = 0.45;
pub const CONTRAST_WEIGHT: f64 = 0.30;
pub const SHARPNESS_WEIGHT: f64 = 0.25;

const MID_GRAY: f64 = 128.0;
const CONTRAST_SATURATION: f64 = 64.0;
const SHARPNESS_SATURATION: f64 = 40.0;

/// Normalized quality components of a frame, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameQuality {
    pub exposure: f64,
    pub contrast: f64,
    pub sharpness: f64,
}

impl FrameQuality {
    /// Combines the raw statistics, substituting neutral defaults for missing values:
    /// mean luma 128, spread 0, edge intensity 0.
    pub fn from_stats(luma: &LumaStats, edge: Option<&EdgeStats>) -> Self {
        let y = finite_or(luma.mean, MID_GRAY);
        let s = finite_or(luma.stdev, 0.0);
        let e = finite_or(edge.and_then(|edge| edge.mean), 0.0);

        Self {
            exposure: 1.0 - ((y - MID_GRAY).abs() / MID_GRAY).min(1.0),
            contrast: (s / CONTRAST_SATURATION).clamp(0.0, 1.0),
            sharpness: (e / SHARPNESS_SATURATION).clamp(0.0, 1.0),
        }
    }

    /// Weighted score in `[0, 1]`.
    pub fn score(&self) -> f64 {
        let score = EXPOSURE_WEIGHT * self.exposure
            + CONTRAST_WEIGHT * self.contrast
            + SHARPNESS_WEIGHT * self.sharpness;
        score.clamp(0.0, 1.0)
    }
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Measures one extracted image. Never fails: missing luminance statistics yield an all-zero
/// quality, missing edge statistics only zero the sharpness.
pub async fn assess_frame<T: MediaTool + ?Sized>(tool: &T, image: &Path) -> FrameQuality {
    let luma = match tool.luma_stats(image).await {
        Ok(luma) => luma,
        Err(e) => {
            warn!(image = %image.display(), error = %e, "luminance statistics unavailable");
            return FrameQuality::default();
        }
    };

    let edge = match tool.edge_stats(image).await {
        Ok(edge) => Some(edge),
        Err(e) => {
            warn!(image = %image.display(), error = %e, "edge statistics unavailable");
            None
        }
    };

    let quality = FrameQuality::from_stats(&luma, edge.as_ref());
    debug!(
        image = %image.display(),
        exposure = quality.exposure,
        contrast = quality.contrast,
        sharpness = quality.sharpness,
        "frame assessed"
    );
    quality
}

/// Quality score of one extracted image in `[0, 1]`.
pub async fn score_frame<T: MediaTool + ?Sized>(tool: &T, image: &Path) -> f64 {
    assess_frame(tool, image).await.score()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luma(mean: f64, stdev: f64) -> LumaStats {
        LumaStats {
            mean: Some(mean),
            stdev: Some(stdev),
        }
    }

    fn edge(mean: f64) -> EdgeStats {
        EdgeStats { mean: Some(mean) }
    }

    #[test]
    fn ideal_frame_scores_one() {
        let quality = FrameQuality::from_stats(&luma(128.0, 64.0), Some(&edge(40.0)));
        assert!((quality.score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn components_saturate() {
        let quality = FrameQuality::from_stats(&luma(128.0, 200.0), Some(&edge(255.0)));
        assert_eq!(quality.contrast, 1.0);
        assert_eq!(quality.sharpness, 1.0);
    }

    #[test]
    fn exposure_is_symmetric_around_mid_gray() {
        let dark = FrameQuality::from_stats(&luma(64.0, 0.0), None);
        let bright = FrameQuality::from_stats(&luma(192.0, 0.0), None);
        assert!((dark.exposure - 0.5).abs() < 1e-12);
        assert!((dark.exposure - bright.exposure).abs() < 1e-12);

        let black = FrameQuality::from_stats(&luma(0.0, 0.0), None);
        assert_eq!(black.exposure, 0.0);
        assert_eq!(black.score(), 0.0);
    }

    #[test]
    fn missing_fields_use_neutral_defaults() {
        let quality = FrameQuality::from_stats(&LumaStats::default(), None);
        assert_eq!(quality.exposure, 1.0);
        assert_eq!(quality.contrast, 0.0);
        assert_eq!(quality.sharpness, 0.0);
        assert!((quality.score() - EXPOSURE_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn non_finite_values_use_defaults() {
        let stats = LumaStats {
            mean: Some(f64::NAN),
            stdev: Some(f64::INFINITY),
        };
        let quality = FrameQuality::from_stats(&stats, Some(&EdgeStats { mean: Some(f64::NAN) }));
        assert_eq!(quality, FrameQuality::from_stats(&LumaStats::default(), None));
    }

    #[test]
    fn weights_follow_documented_split() {
        let quality = FrameQuality::from_stats(&luma(128.0, 32.0), Some(&edge(10.0)));
        let expected = 0.45 + 0.30 * 0.5 + 0.25 * 0.25;
        assert!((quality.score() - expected).abs() < 1e-12);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        for y in [-50.0, 0.0, 60.0, 128.0, 255.0, 400.0] {
            for s in [-10.0, 0.0, 30.0, 64.0, 500.0] {
                for e in [-5.0, 0.0, 20.0, 40.0, 300.0] {
                    let score = FrameQuality::from_stats(&luma(y, s), Some(&edge(e))).score();
                    assert!((0.0..=1.0).contains(&score), "{y} {s} {e} -> {score}");
                }
            }
        }
    }
}
