//! Parsing of ffmpeg's diagnostic text into numeric key/value pairs.
//!
//! Two shapes are understood: bracketed per-plane lists as printed by `showinfo`
//! (`mean:[97 128 128] stdev:[45.3 0 0]`) and scalar pairs such as
//! `lavfi.signalstats.YAVG=97.2` or `pts_time:0.04`.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

use crate::types::{EdgeStats, LumaStats};

static LIST_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][\w.]*):\[([^\]]*)\]").expect("list pattern is valid")
});

static SCALAR_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][\w.]*)[=:]\s*(-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("scalar pattern is valid")
});

const SIGNALSTATS_MEAN: &str = "lavfi.signalstats.YAVG";

/// Collects every numeric key/value pair found in `text`. Later occurrences of a key
/// replace earlier ones.
pub fn parse_key_values(text: &str) -> HashMap<String, Vec<f64>> {
    let mut values = HashMap::new();

    for line in text.lines() {
        for caps in LIST_PAIR.captures_iter(line) {
            let numbers: Vec<f64> = caps[2]
                .split_whitespace()
                .filter_map(|token| token.parse().ok())
                .collect();
            if !numbers.is_empty() {
                values.insert(caps[1].to_string(), numbers);
            }
        }

        let scalars_only = LIST_PAIR.replace_all(line, " ");
        for caps in SCALAR_PAIR.captures_iter(&scalars_only) {
            if let Ok(number) = caps[2].parse::<f64>() {
                values.insert(caps[1].to_string(), vec![number]);
            }
        }
    }

    values
}

fn first_finite(values: &HashMap<String, Vec<f64>>, key: &str) -> Option<f64> {
    values
        .get(key)
        .and_then(|plane| plane.first().copied())
        .filter(|v| v.is_finite())
}

/// Luma mean and standard deviation. `None` when the text carries neither.
pub fn luma_stats(text: &str) -> Option<LumaStats> {
    let values = parse_key_values(text);
    let stats = LumaStats {
        mean: first_finite(&values, "mean").or_else(|| first_finite(&values, SIGNALSTATS_MEAN)),
        stdev: first_finite(&values, "stdev"),
    };

    (stats.mean.is_some() || stats.stdev.is_some()).then_some(stats)
}

/// Mean of the edge-detected plane. `None` when the text carries no mean.
pub fn edge_stats(text: &str) -> Option<EdgeStats> {
    let values = parse_key_values(text);
    let mean = first_finite(&values, "mean").or_else(|| first_finite(&values, SIGNALSTATS_MEAN));
    mean.map(|mean| EdgeStats { mean: Some(mean) })
}
