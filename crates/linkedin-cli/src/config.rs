use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use linkedin_profile::LinkedInConfig;

use crate::cli::Cli;

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".linkedin"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the strategy configuration.
///
/// An explicit path must exist. The default path is optional and falls back
/// to built-in defaults when absent.
pub fn load(path: Option<&Path>) -> Result<LinkedInConfig> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = default_config_path()?;
            if !p.exists() {
                return Ok(LinkedInConfig::default());
            }
            p
        }
    };

    load_file(&path)
}

fn load_file(path: &Path) -> Result<LinkedInConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let cfg: LinkedInConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(cfg)
}

/// Applies command line overrides on top of the loaded file.
pub fn apply_overrides(mut config: LinkedInConfig, cli: &Cli) -> LinkedInConfig {
    if !cli.scopes.is_empty() {
        config.scopes = cli.scopes.clone();
    }
    if let Some(url) = &cli.api_base_url {
        config.api_base_url = url.clone();
    }
    config
}
