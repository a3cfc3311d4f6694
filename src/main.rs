mod config;
mod rg_json;
mod search;
mod slice_cmd;
mod window;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "repo-slice",
    version,
    about = "Search a repo with ripgrep and print the source around each match",
    long_about = "Runs ripgrep over a repository, then prints a window of lines centered on each match so the context can be read without opening an editor."
)]
struct Cli {
    /// Repository root to search
    #[arg(required_unless_present = "show_config")]
    repo_path: Option<PathBuf>,

    /// Pattern in ripgrep regex syntax (smart case)
    #[arg(required_unless_present = "show_config", allow_hyphen_values = true)]
    pattern: Option<String>,

    /// Maximum number of hits to show [default: 8, or config defaults.max_hits]
    #[arg(value_parser = parse_max_hits)]
    max_hits: Option<usize>,

    /// Lines of context on each side of a hit [default: 60, or config defaults.radius]
    radius: Option<usize>,

    /// Print config path and effective settings, then exit
    #[arg(long)]
    show_config: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn parse_max_hits(raw: &str) -> Result<usize, String> {
    let n: usize = raw.parse().map_err(|e| format!("{e}"))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

/// Absolute form of `path`; falls back to joining the cwd when it cannot be
/// canonicalized (e.g. it does not exist), so the not-found error shows a full path.
fn resolve_root(path: &Path) -> Result<PathBuf> {
    if let Ok(abs) = std::fs::canonicalize(path) {
        return Ok(abs);
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        return config::show_config();
    }

    let cfg = config::Config::load()?;

    let (Some(repo_path), Some(pattern)) = (cli.repo_path, cli.pattern) else {
        anyhow::bail!("repo_path and pattern are required");
    };
    let root = resolve_root(&repo_path)?;
    let max_hits = cli.max_hits.unwrap_or(cfg.defaults.max_hits);
    let radius = cli.radius.unwrap_or(cfg.defaults.radius);
    let excludes = search::ExcludeGlobs::with_extra(&cfg.search.extra_excludes);
    let runner = search::RipgrepRunner::new(&cfg.search.binary, cli.verbose);

    if cli.verbose > 0 {
        eprintln!("root: {}", root.display());
    }

    slice_cmd::run(
        &runner,
        &root,
        &pattern,
        max_hits,
        radius,
        &excludes,
        cli.verbose,
    )?;

    Ok(())
}
