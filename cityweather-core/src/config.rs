use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::DEFAULT_ICON_BASE_URL;
use crate::provider::visualcrossing::DEFAULT_BASE_URL;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "VISUALCROSSING_API_KEY";

/// Configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// # base_url = "http://localhost:8080/timeline"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Visual Crossing access key.
    pub api_key: Option<String>,

    /// Override for the timeline endpoint.
    pub base_url: Option<String>,

    /// Override for the icon asset base.
    pub icon_base_url: Option<String>,
}

impl Config {
    /// Load config from `path`, or an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        cfg.api_key = cfg.api_key.map(|k| k.trim().to_string());

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Let `VISUALCROSSING_API_KEY` take precedence over the stored key.
    pub fn apply_env(&mut self) {
        self.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key_override(&mut self, value: Option<String>) {
        let key = value.map(|k| k.trim().to_string());
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            tracing::debug!("using API key from {API_KEY_ENV}");
            self.api_key = Some(key);
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Effective API key. Empty when none is configured; the server rejects it with 401.
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn icon_base_url(&self) -> &str {
        self.icon_base_url.as_deref().unwrap_or(DEFAULT_ICON_BASE_URL)
    }
}
