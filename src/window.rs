//! Slices a bounded window of lines around a center line.

use std::path::Path;

/// Render `radius` lines on each side of `center_line` (1-based) as
/// `<file>:<line> (lines <start>-<end>)` followed by the lines themselves.
///
/// Returns an empty string when the file is missing or unreadable, the
/// center is 0, or the file has no lines. The window is truncated at file
/// boundaries, never padded. A center past the last line (the file shrank
/// after the search) still renders: the header shows the computed range
/// and the body holds whatever lines fall inside it, possibly none.
pub fn slice_window(file: &Path, center_line: u64, radius: usize) -> String {
    if !file.exists() || center_line == 0 {
        return String::new();
    }

    let bytes = match std::fs::read(file) {
        Ok(b) => b,
        Err(_) => return String::new(),
    };
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let (start, end) = window_bounds(center_line, radius, lines.len());

    let mut out = format!(
        "{}:{} (lines {}-{})\n",
        file.display(),
        center_line,
        start.saturating_add(1),
        end
    );
    if let Some(body) = lines.get(start..end) {
        out.push_str(&body.join("\n"));
    }
    out
}

/// Zero-based half-open `[start, end)` around `center_line`; `end` is
/// clamped to `total`. When the center lies beyond the file, `start` can
/// exceed `end`.
fn window_bounds(center_line: u64, radius: usize, total: usize) -> (usize, usize) {
    let idx = usize::try_from(center_line.saturating_sub(1)).unwrap_or(usize::MAX);
    let start = idx.saturating_sub(radius);
    let end = idx.saturating_add(radius).saturating_add(1).min(total);
    (start, end)
}
