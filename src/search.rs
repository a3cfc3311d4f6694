//! External search invocation: builds the rg command line, runs it,
//! and hands stdout to the JSON decoder.

use crate::rg_json::{self, MatchRecord};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Directories never worth slicing: VCS metadata, dependency/build output,
/// caches and virtualenvs.
pub const DEFAULT_EXCLUDE_GLOBS: &[&str] = &[
    "!**/.git/**",
    "!**/node_modules/**",
    "!**/dist/**",
    "!**/build/**",
    "!**/.next/**",
    "!**/out/**",
    "!**/coverage/**",
    "!**/.turbo/**",
    "!**/.cache/**",
    "!**/.venv/**",
    "!**/venv/**",
    "!**/__pycache__/**",
];

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Repo root not found: {}", .0.display())]
    RepoRootNotFound(PathBuf),
    #[error("failed to run {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered, immutable set of negated globs passed to every search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeGlobs(Vec<String>);

impl ExcludeGlobs {
    /// Built-in set followed by `extra`; entries lacking `!` are negated.
    pub fn with_extra(extra: &[String]) -> Self {
        let mut globs: Vec<String> = DEFAULT_EXCLUDE_GLOBS.iter().map(|g| g.to_string()).collect();
        for glob in extra {
            let glob = glob.trim();
            if glob.is_empty() {
                continue;
            }
            if glob.starts_with('!') {
                globs.push(glob.to_string());
            } else {
                globs.push(format!("!{glob}"));
            }
        }
        Self(globs)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ExcludeGlobs {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

/// Captured streams of one finished search process, lossily decoded.
#[derive(Debug, Clone, Default)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Capability to run one search. Swapped for a fake in tests.
pub trait SearchRunner {
    fn run(
        &self,
        root: &Path,
        pattern: &str,
        excludes: &ExcludeGlobs,
    ) -> Result<RawOutput, SearchError>;
}

/// Runs the real `rg` (or a configured replacement) and waits for it.
#[derive(Debug, Clone)]
pub struct RipgrepRunner {
    binary: PathBuf,
    verbose: u8,
}

impl RipgrepRunner {
    pub fn new(binary: impl Into<PathBuf>, verbose: u8) -> Self {
        Self {
            binary: binary.into(),
            verbose,
        }
    }
}

/// `--json --smart-case --text`, one `--glob` per exclude, then pattern and root.
pub fn build_rg_args(root: &Path, pattern: &str, excludes: &ExcludeGlobs) -> Vec<String> {
    let mut args: Vec<String> = vec!["--json".into(), "--smart-case".into(), "--text".into()];
    for glob in excludes.iter() {
        args.push("--glob".into());
        args.push(glob.to_string());
    }
    args.push(pattern.to_string());
    args.push(root.to_string_lossy().into_owned());
    args
}

impl SearchRunner for RipgrepRunner {
    fn run(
        &self,
        root: &Path,
        pattern: &str,
        excludes: &ExcludeGlobs,
    ) -> Result<RawOutput, SearchError> {
        let args = build_rg_args(root, pattern, excludes);
        if self.verbose > 0 {
            eprintln!("search: {} {}", self.binary.display(), args.join(" "));
        }

        // Exit status is not interpreted: 1 (no match) and 2 (error) are both
        // judged by what landed on stdout/stderr.
        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|source| SearchError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if self.verbose > 1 {
            eprintln!("search: exited with {:?}", output.status.code());
        }

        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// The stderr text to echo: only when stdout is blank and stderr is not.
/// Warnings next to real matches are never printed.
pub fn stderr_diagnostic(output: &RawOutput) -> Option<&str> {
    if !output.stdout.trim().is_empty() {
        return None;
    }
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        None
    } else {
        Some(stderr)
    }
}

/// Search `root` for `pattern` and decode at most `max_hits` matches.
///
/// A blank pattern returns nothing without touching the runner. When the
/// search prints nothing on stdout, its stderr (if any) is echoed and the
/// result is empty; a tool error and "no matches" look the same to callers.
pub fn find_matches(
    runner: &dyn SearchRunner,
    root: &Path,
    pattern: &str,
    max_hits: usize,
    excludes: &ExcludeGlobs,
    verbose: u8,
) -> Result<Vec<MatchRecord>, SearchError> {
    if !root.exists() {
        return Err(SearchError::RepoRootNotFound(root.to_path_buf()));
    }

    if pattern.trim().is_empty() {
        return Ok(Vec::new());
    }

    let output = runner.run(root, pattern, excludes)?;

    if let Some(diagnostic) = stderr_diagnostic(&output) {
        println!("{}", diagnostic);
    }
    if output.stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(rg_json::parse_matches(&output.stdout, max_hits, verbose))
}
