//! Search-and-slice orchestrator: rg matches in, printable hit windows out.

use crate::search::{self, ExcludeGlobs, SearchError, SearchRunner};
use crate::window;
use std::path::{Path, PathBuf};

/// One match with its rendered window. The window is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub file: PathBuf,
    pub line: u64,
    pub window: String,
}

/// Run the search and slice a window around each match, in match order.
/// Matches whose window comes back blank are dropped; nothing is deduplicated.
pub fn search_and_slice(
    runner: &dyn SearchRunner,
    root: &Path,
    pattern: &str,
    max_hits: usize,
    radius: usize,
    excludes: &ExcludeGlobs,
    verbose: u8,
) -> Result<Vec<Hit>, SearchError> {
    let matches = search::find_matches(runner, root, pattern, max_hits, excludes, verbose)?;
    if matches.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits = Vec::with_capacity(matches.len());
    for m in matches {
        let window = window::slice_window(&m.path, m.line, radius);
        if window.trim().is_empty() {
            if verbose > 1 {
                eprintln!("slice: dropped {}:{} (no window)", m.path.display(), m.line);
            }
            continue;
        }
        hits.push(Hit {
            file: m.path,
            line: m.line,
            window,
        });
    }

    Ok(hits)
}

/// Text printed for a finished search: `No matches.` or one banner per hit.
pub fn render_hits(hits: &[Hit]) -> String {
    if hits.is_empty() {
        return "No matches.\n".to_string();
    }

    let mut out = String::new();
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!("\n===== HIT {}/{} =====\n", i + 1, hits.len()));
        out.push_str(&hit.window);
        out.push('\n');
    }
    out
}

pub fn run(
    runner: &dyn SearchRunner,
    root: &Path,
    pattern: &str,
    max_hits: usize,
    radius: usize,
    excludes: &ExcludeGlobs,
    verbose: u8,
) -> Result<(), SearchError> {
    if verbose > 0 {
        eprintln!(
            "slice: '{}' in {} (max_hits={}, radius={})",
            pattern,
            root.display(),
            max_hits,
            radius
        );
    }

    let hits = search_and_slice(runner, root, pattern, max_hits, radius, excludes, verbose)?;
    if verbose > 1 {
        for hit in &hits {
            eprintln!("slice: hit {}:{}", hit.file.display(), hit.line);
        }
    }
    print!("{}", render_hits(&hits));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests::FakeRunner;
    use std::fs;

    fn match_json(path: &Path, line: u64) -> String {
        serde_json::json!({
            "type": "match",
            "data": {
                "path": { "text": path.to_str().unwrap() },
                "lines": { "text": "x\n" },
                "line_number": line,
                "absolute_offset": 0,
                "submatches": []
            }
        })
        .to_string()
    }

    fn ten_line_repo() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        let body: Vec<String> = (1..=10).map(|i| format!("row {i}")).collect();
        fs::write(&file, body.join("\n") + "\n").unwrap();
        (tmp, file)
    }

    #[test]
    fn single_hit_window_around_line_five() {
        let (tmp, file) = ten_line_repo();
        let runner = FakeRunner::with_stdout(match_json(&file, 5));

        let hits =
            search_and_slice(&runner, tmp.path(), "row 5", 1, 2, &ExcludeGlobs::default(), 0)
                .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file, file);
        assert_eq!(hits[0].line, 5);
        let mut lines = hits[0].window.lines();
        assert_eq!(
            lines.next().unwrap(),
            format!("{}:5 (lines 3-7)", file.display())
        );
        assert_eq!(
            lines.collect::<Vec<_>>(),
            ["row 3", "row 4", "row 5", "row 6", "row 7"]
        );
    }

    #[test]
    fn vanished_files_are_dropped_and_order_kept() {
        let (tmp, file) = ten_line_repo();
        let gone = tmp.path().join("deleted.rs");
        let stdout = [
            match_json(&file, 9),
            match_json(&gone, 1),
            match_json(&file, 2),
            match_json(&file, 2),
        ]
        .join("\n");
        let runner = FakeRunner::with_stdout(stdout);

        let hits =
            search_and_slice(&runner, tmp.path(), "row", 8, 0, &ExcludeGlobs::default(), 0)
                .unwrap();

        let lines: Vec<u64> = hits.iter().map(|h| h.line).collect();
        assert_eq!(lines, [9, 2, 2], "no dedup, match order preserved");
        assert!(hits.iter().all(|h| !h.window.trim().is_empty()));
    }

    #[test]
    fn file_shrunk_after_search_keeps_hit() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("short.txt");
        fs::write(&file, "a\nb\nc\n").unwrap();
        let runner = FakeRunner::with_stdout(match_json(&file, 10));

        let hits = search_and_slice(&runner, tmp.path(), "x", 8, 60, &ExcludeGlobs::default(), 0)
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].window,
            format!("{}:10 (lines 1-3)\na\nb\nc", file.display())
        );
    }

    #[test]
    fn hit_count_never_exceeds_cap() {
        let (tmp, file) = ten_line_repo();
        let stdout: Vec<String> = (1..=10).map(|i| match_json(&file, i)).collect();
        let runner = FakeRunner::with_stdout(stdout.join("\n"));

        let hits =
            search_and_slice(&runner, tmp.path(), "row", 3, 1, &ExcludeGlobs::default(), 0)
                .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn render_no_matches() {
        assert_eq!(render_hits(&[]), "No matches.\n");
    }

    #[test]
    fn render_banners_number_each_hit() {
        let hits = vec![
            Hit {
                file: PathBuf::from("a.rs"),
                line: 1,
                window: "a.rs:1 (lines 1-1)\nfn a() {}".to_string(),
            },
            Hit {
                file: PathBuf::from("b.rs"),
                line: 4,
                window: "b.rs:4 (lines 4-4)\nfn b() {}".to_string(),
            },
        ];

        assert_eq!(
            render_hits(&hits),
            "\n===== HIT 1/2 =====\na.rs:1 (lines 1-1)\nfn a() {}\n\
             \n===== HIT 2/2 =====\nb.rs:4 (lines 4-4)\nfn b() {}\n"
        );
    }
}
