//! Application configuration
//!
//! Settings come from a JSON file: the path in `SOUNDBOARD_CONFIG` if set,
//! otherwise `soundboard.json` in the working directory. A missing default
//! file means defaults; a file that exists but does not parse is an error.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Catalog, CatalogEntryConfig};
use crate::share::DEFAULT_DIALOG_TITLE;

pub const CONFIG_ENV_VAR: &str = "SOUNDBOARD_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "soundboard.json";
const MAX_GRID_COLUMNS: usize = 6;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub assets_dir: PathBuf,
    pub share_dir: PathBuf,
    pub log_dir: PathBuf,
    pub grid_columns: usize,
    pub share_dialog_title: String,
    /// Command used instead of the platform opener; supports `{path}`, `{mime}`, `{title}`.
    pub share_command: Option<Vec<String>>,
    /// Replaces the built-in clip list when present.
    pub catalog: Option<Vec<CatalogEntryConfig>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets/audios"),
            share_dir: PathBuf::from(".cache/shared"),
            log_dir: PathBuf::from(".logs"),
            grid_columns: 2,
            share_dialog_title: DEFAULT_DIALOG_TITLE.to_string(),
            share_command: None,
            catalog: None,
        }
    }
}

impl AppConfig {
    /// Load from `SOUNDBOARD_CONFIG` or `soundboard.json`, falling back to defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(content)?;
        config.grid_columns = config.grid_columns.clamp(1, MAX_GRID_COLUMNS);
        Ok(config)
    }

    pub fn build_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(entries) => Ok(Catalog::from_config(entries)?),
            None => Ok(Catalog::builtin()),
        }
    }
}
