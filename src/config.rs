use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Search executable settings
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Executable invoked for the search (default: `rg` from PATH)
    #[serde(default = "SearchConfig::default_binary")]
    pub binary: PathBuf,
    /// Globs excluded on top of the built-in set. A missing leading `!` is added.
    #[serde(default)]
    pub extra_excludes: Vec<String>,
}

impl SearchConfig {
    fn default_binary() -> PathBuf {
        PathBuf::from("rg")
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            binary: Self::default_binary(),
            extra_excludes: Vec::new(),
        }
    }
}

/// Fallbacks for the optional positional arguments
#[derive(Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "DefaultsConfig::default_max_hits")]
    pub max_hits: usize,
    #[serde(default = "DefaultsConfig::default_radius")]
    pub radius: usize,
}

impl DefaultsConfig {
    fn default_max_hits() -> usize {
        8
    }
    fn default_radius() -> usize {
        60
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_hits: Self::default_max_hits(),
            radius: Self::default_radius(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(config_dir.join("repo-slice").join("config.toml"))
}

pub fn show_config() -> Result<()> {
    let path = get_config_path()?;
    println!("Config: {}", path.display());
    println!();

    if path.exists() {
        let config = Config::load_from(&path)?;
        println!("{}", toml::to_string_pretty(&config)?);
    } else {
        println!("(default config, file not created)");
        println!();
        let config = Config::default();
        println!("{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}
