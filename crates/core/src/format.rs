use std::path::PathBuf;

use crate::types::Selection;

/// Format seconds as MM:SS.mmm
pub fn format_timestamp(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let mins = total_millis / 60_000;
    let secs = (total_millis / 1000) % 60;
    let millis = total_millis % 1000;
    format!("{:02}:{:02}.{:03}", mins, secs, millis)
}

/// File name of the `index`-th (zero based) materialized pick.
pub fn pick_file_name(index: usize) -> String {
    format!("frame_{:02}.jpg", index + 1)
}

/// Format a selection as a plain-text table, one pick per line
pub fn format_selection_readable(selection: &Selection, files: &[PathBuf]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Duration: {} | Picks: {}\n\n",
        format_timestamp(selection.duration),
        selection.picks.len()
    ));

    for (i, pick) in selection.picks.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. [{}] score {:.3}",
            i + 1,
            format_timestamp(pick.timestamp),
            pick.score
        ));
        if let Some(file) = files.get(i) {
            output.push_str(&format!("  {}", file.display()));
        }
        output.push('\n');
    }

    output
}
