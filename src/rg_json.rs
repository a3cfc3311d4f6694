//! Decoder for ripgrep's `--json` event stream.
//! Only `match` events carry hits; `begin`/`end`/`context`/`summary` are dropped.

use serde::Deserialize;
use std::path::PathBuf;

/// One decoded match: the file and its 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub path: PathBuf,
    pub line: u64,
}

#[derive(Debug, Deserialize)]
struct RgEvent {
    #[serde(rename = "type")]
    kind: String,
    data: Option<MatchData>,
}

/// Payload of a `match` event. Every field is optional so that other event
/// kinds and partial records still decode; rg's extra fields are ignored.
#[derive(Debug, Deserialize)]
struct MatchData {
    path: Option<TextWrapper>,
    /// Kept loose so a non-integer value skips the record instead of the line.
    line_number: Option<serde_json::Value>,
}

/// rg wraps strings as `{"text": ...}`, or `{"bytes": ...}` for non-UTF-8.
#[derive(Debug, Deserialize)]
struct TextWrapper {
    text: Option<String>,
}

/// Decode up to `max_hits` match records from raw rg stdout.
/// Malformed lines and records missing `path.text` or an integer
/// `line_number` are skipped. Stops reading once the cap is reached.
pub fn parse_matches(stdout: &str, max_hits: usize, verbose: u8) -> Vec<MatchRecord> {
    let mut hits = Vec::new();
    if max_hits == 0 {
        return hits;
    }

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let event: RgEvent = match serde_json::from_str(line) {
            Ok(ev) => ev,
            Err(err) => {
                if verbose > 1 {
                    eprintln!("rg-json: skipping malformed line: {err}");
                }
                continue;
            }
        };
        if event.kind != "match" {
            continue;
        }

        let Some(data) = event.data else {
            continue;
        };
        let Some(path) = data.path.and_then(|p| p.text) else {
            if verbose > 1 {
                eprintln!("rg-json: match without path.text, skipped");
            }
            continue;
        };
        let Some(line_no) = data.line_number.as_ref().and_then(|v| v.as_u64()) else {
            if verbose > 1 {
                eprintln!("rg-json: match in {path} without line_number, skipped");
            }
            continue;
        };

        hits.push(MatchRecord {
            path: PathBuf::from(path),
            line: line_no,
        });
        if hits.len() >= max_hits {
            break;
        }
    }

    hits
}
