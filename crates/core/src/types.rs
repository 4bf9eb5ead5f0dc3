use serde::{Deserialize, Serialize};

/// A candidate timestamp together with the quality score of its frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub timestamp: f64,
    pub score: f64,
}

impl ScoredCandidate {
    pub fn new(timestamp: f64, score: f64) -> Self {
        Self { timestamp, score }
    }
}

/// A scored candidate that made it into the final selection.
pub type Pick = ScoredCandidate;

/// Result of one selection run. Picks are in ascending timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub duration: f64,
    pub picks: Vec<Pick>,
}

/// Grayscale luminance statistics as reported by the media tool.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LumaStats {
    pub mean: Option<f64>,
    pub stdev: Option<f64>,
}

/// Mean intensity of the edge-detected grayscale image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeStats {
    pub mean: Option<f64>,
}
